//! Wallet Connector
//!
//! This crate provides a unified interface for connecting to heterogeneous
//! wallet integrations (injected browser wallets, mobile wallets, SDK
//! connectors) through a common connection provider abstraction.
//!
//! Application code holds a [`ConnectionProvider`], reads its option to
//! render choices, calls `connect` and subscribes to the state stream:
//!
//! ```no_run
//! use futures::StreamExt;
//! use wallet_connector::{ConnectionProvider, ConnectionProviderExt, ConnectionState};
//!
//! async fn watch<P>(provider: P) -> wallet_connector::Result<()>
//! where
//!     P: ConnectionProvider<Connection = String>,
//! {
//!     let provider = provider.map_connection(|address| address.to_lowercase());
//!     let mut states = provider.connection();
//!     provider.connect().await?;
//!
//!     while let Some(state) = states.next().await {
//!         if let ConnectionState::Connected(address) = state {
//!             println!("connected as {}", address);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod mapper;
pub mod provider;
pub mod registry;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use channel::{StateChannel, DEFAULT_CHANNEL_CAPACITY};
pub use error::ProviderError;
pub use mapper::{map_connection, map_option, MappedConnectionProvider, MappedOptionProvider};
pub use provider::{
    ConnectionProvider, ConnectionProviderExt, ConnectionStream, DynConnectionProvider,
};
pub use registry::{ProviderRegistry, RegistryConfig, RegistryError, SharedProvider};
pub use types::{ConnectionState, ConnectionStatus};
pub use wallet::{WalletBackend, WalletProvider, WalletProviderConfig};

pub type Result<T> = std::result::Result<T, ProviderError>;
