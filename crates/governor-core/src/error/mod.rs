//! Error types for the request governor
//!
//! Every fallible operation in the crate returns [`GovernorResult`]. The model
//! capability reports failures through the same type; [`classify_failure`]
//! decides whether a failure is a retryable quota rejection or a fatal provider
//! error.

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use classifiers::{FailureKind, classify_failure};
pub use types::{GovernorError, GovernorResult};
