//! Shared models for the `fronter` workspace.
//!
//! Everything here is plain data: candidate identifiers, provider profiles,
//! scan configuration, the per-category job progress record and the CIDR
//! helpers used when assembling a candidate pool. No network IO happens in
//! this crate.

pub mod candidate;
pub mod config;
pub mod error;
pub mod job;
pub mod network;
pub mod provider;

pub use error::FronterError;
