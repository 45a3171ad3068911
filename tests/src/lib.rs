//! End-to-end tests of the fronter engine over deterministic stubs and
//! loopback listeners.
#![cfg(test)]

mod engine;
mod pipeline;
mod support;
