//! Builder for GovernedClient

use super::governed::GovernedClient;
use crate::clock::{Clock, TokioClock};
use crate::config::GovernorConfig;
use crate::error::GovernorResult;
use crate::model::ModelCapability;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builder for [`GovernedClient`]
pub struct GovernedClientBuilder {
    model: Arc<dyn ModelCapability>,
    config: GovernorConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl GovernedClientBuilder {
    pub fn new(model: Arc<dyn ModelCapability>) -> Self {
        Self {
            model,
            config: GovernorConfig::default(),
            clock: Arc::new(TokioClock),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(mut self, config: GovernorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the time source (tests use `ManualClock`)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Token whose cancellation aborts every wait of this client
    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> GovernorResult<GovernedClient> {
        self.config.validate()?;
        Ok(GovernedClient::from_parts(
            self.model,
            self.config,
            self.clock,
            self.cancel,
        ))
    }
}
