/// Errors surfaced by connection providers.
///
/// Mappers never wrap or translate these; whatever the source provider
/// returns reaches the caller unchanged.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// A query (`is_auto_connected`, `option`, `is_connected`) failed
    #[error("Query failed: {0}")]
    Query(String),

    /// The wallet handshake failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The user or the wallet refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// `connect` was called while the provider has no option to connect with
    #[error("No connection option available")]
    OptionUnavailable,

    /// Invalid provider or registry configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other errors not covered by specific cases
    #[error("Other: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<String> for ProviderError {
    fn from(error: String) -> Self {
        ProviderError::Other(error)
    }
}

impl From<&str> for ProviderError {
    fn from(error: &str) -> Self {
        ProviderError::Other(error.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        ProviderError::Configuration(format!("Invalid JSON: {}", error))
    }
}
