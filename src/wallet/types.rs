// Wallet provider configuration

use serde::{Deserialize, Serialize};

use crate::channel::DEFAULT_CHANNEL_CAPACITY;
use crate::error::ProviderError;

/// Upper bound on buffered states per subscriber
pub const MAX_CHANNEL_CAPACITY: usize = 1024;

/// Configuration parameters for a wallet provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletProviderConfig {
    /// Stable provider identifier, e.g. `"injected"` or `"beacon"`
    pub id: String,
    /// States buffered per subscriber before it lags
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl WalletProviderConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.id.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Provider id cannot be empty".to_string(),
            ));
        }

        if self.channel_capacity == 0 || self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(ProviderError::Configuration(format!(
                "Channel capacity must be between 1 and {}, got {}",
                MAX_CHANNEL_CAPACITY, self.channel_capacity
            )));
        }

        Ok(())
    }
}

/// Builder pattern for WalletProviderConfig
pub struct WalletProviderConfigBuilder {
    config: WalletProviderConfig,
}

impl WalletProviderConfigBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            config: WalletProviderConfig::new(id),
        }
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<WalletProviderConfig, ProviderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
