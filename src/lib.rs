//! Quota governor
//!
//! Facade over [`governor_core`]: a model client that keeps one process under
//! a hosted provider's request quotas. The `governor` binary lives in the
//! `governor-cli` crate.

pub use governor_core::*;
