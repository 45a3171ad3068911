//! Low-level probes. Each function answers one yes/no (or how-long) question
//! about a single host and swallows every error into a negative answer.

pub mod http;
pub mod ping;
pub mod rdap;
pub mod tcp;
pub mod tls;
