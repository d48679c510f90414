use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Configuration for the provider registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Maximum number of registered providers
    pub max_providers: usize,

    /// Whether `register` may replace a provider with the same id
    pub allow_replace: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_providers: 16,
            allow_replace: false,
        }
    }
}

impl RegistryConfig {
    /// Create a new registry configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a more permissive configuration
    pub fn permissive() -> Self {
        Self {
            max_providers: 64,
            allow_replace: true,
        }
    }

    /// Create a stricter configuration
    pub fn strict() -> Self {
        Self {
            max_providers: 4,
            allow_replace: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.max_providers == 0 {
            return Err(ProviderError::Configuration(
                "Registry must accept at least one provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder pattern methods
    pub fn with_max_providers(mut self, max: usize) -> Self {
        self.max_providers = max;
        self
    }

    pub fn with_replace(mut self, allow: bool) -> Self {
        self.allow_replace = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_and_json() {
        assert!(RegistryConfig::permissive().allow_replace);
        assert!(!RegistryConfig::strict().allow_replace);
        assert_eq!(RegistryConfig::new().with_max_providers(2).max_providers, 2);

        let config =
            RegistryConfig::from_json(r#"{ "max_providers": 3, "allow_replace": true }"#).unwrap();
        assert_eq!(config, RegistryConfig::default().with_max_providers(3).with_replace(true));

        assert!(RegistryConfig::from_json(r#"{ "max_providers": 0, "allow_replace": true }"#)
            .is_err());
        assert!(RegistryConfig::from_json("not json").is_err());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        assert!(RegistryConfig::strict().validate().is_ok());
        assert!(matches!(
            RegistryConfig::default().with_max_providers(0).validate(),
            Err(ProviderError::Configuration(_))
        ));
    }
}
