//! Governed model client
//!
//! [`GovernedClient`] composes the rate limiter, quota tracker and cache around
//! a [`ModelCapability`](crate::model::ModelCapability). It is built once per
//! process and shared by reference (or `Arc`) with whatever issues calls.

mod builder;
mod governed;
mod stats;

#[cfg(test)]
mod tests;

pub use builder::GovernedClientBuilder;
pub use governed::GovernedClient;
pub use stats::ClientStats;
