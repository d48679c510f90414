pub mod backend;
pub mod provider;
pub mod types;

pub use backend::WalletBackend;
pub use provider::WalletProvider;
pub use types::{WalletProviderConfig, WalletProviderConfigBuilder, MAX_CHANNEL_CAPACITY};
