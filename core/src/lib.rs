//! # Fronter Engine
//!
//! Finds a small set of clean front-end candidates in a large, noisy pool.
//!
//! ## Layout
//! * **[`pool`]**: assembles the deduplicated candidate pool.
//! * **[`prober`]** and **[`network`]**: the probing seam and its network primitives.
//! * **[`scanner`]**: the domain and address validation pipelines.
//! * **[`collector`]**: bounded-concurrency scheduling with early stop.
//! * **[`ranker`]**: latency measurement and top-K selection.
//! * **[`job`]**: per-category job slots with live progress.
//! * **[`engine`]**: runs jobs and manual validations end to end.
//! * **[`sources`]**: downloads candidate source lists.

pub mod collector;
pub mod engine;
pub mod job;
pub mod network;
pub mod pool;
pub mod prober;
pub mod ranker;
pub mod scanner;
pub mod sources;
