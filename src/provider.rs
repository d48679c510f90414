// Connection provider contract

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::ProviderError;
use crate::mapper::{MappedConnectionProvider, MappedOptionProvider};
use crate::types::ConnectionState;

/// Live stream of connection states handed to one subscriber.
pub type ConnectionStream<C> = BoxStream<'static, ConnectionState<C>>;

/// Type alias for a type-erased provider.
pub type DynConnectionProvider<O, C> = dyn ConnectionProvider<Choice = O, Connection = C>;

/// Core trait for connection providers (injected wallets, mobile wallets,
/// SDK connectors, ...).
///
/// Every operation may be called any number of times. Subscribing to
/// [`ConnectionProvider::connection`] never starts a connection attempt.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// A selectable connection option, e.g. a detected wallet extension.
    type Choice: Send + 'static;
    /// Payload of an established connection, e.g. a wallet client handle.
    type Connection: Send + 'static;

    /// Stable identifier of this provider.
    fn id(&self) -> &str;

    /// Whether this provider connects itself without user action.
    /// Injected mobile providers are usually connected by default.
    async fn is_auto_connected(&self) -> Result<bool, ProviderError>;

    /// The currently available option, or `None` when there is nothing to
    /// connect with (no injected wallet found, ...).
    async fn option(&self) -> Result<Option<Self::Choice>, ProviderError>;

    /// List view of the available options.
    async fn options(&self) -> Result<Vec<Self::Choice>, ProviderError> {
        Ok(self.option().await?.into_iter().collect())
    }

    /// Whether a non-interactive reconnect is possible (unexpired session).
    async fn is_connected(&self) -> Result<bool, ProviderError>;

    /// Start connecting with the current option.
    ///
    /// Completion and failure are observed on the state stream; the result
    /// only reports whether the attempt could be started.
    async fn connect(&self) -> Result<(), ProviderError>;

    /// Subscribe to connection states.
    ///
    /// Each call registers a new independent subscriber.
    fn connection(&self) -> ConnectionStream<Self::Connection>;
}

#[async_trait]
impl<P> ConnectionProvider for Arc<P>
where
    P: ConnectionProvider + ?Sized,
{
    type Choice = P::Choice;
    type Connection = P::Connection;

    fn id(&self) -> &str {
        (**self).id()
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        (**self).is_auto_connected().await
    }

    async fn option(&self) -> Result<Option<Self::Choice>, ProviderError> {
        (**self).option().await
    }

    async fn options(&self) -> Result<Vec<Self::Choice>, ProviderError> {
        (**self).options().await
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        (**self).is_connected().await
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        (**self).connect().await
    }

    fn connection(&self) -> ConnectionStream<Self::Connection> {
        (**self).connection()
    }
}

#[async_trait]
impl<P> ConnectionProvider for Box<P>
where
    P: ConnectionProvider + ?Sized,
{
    type Choice = P::Choice;
    type Connection = P::Connection;

    fn id(&self) -> &str {
        (**self).id()
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        (**self).is_auto_connected().await
    }

    async fn option(&self) -> Result<Option<Self::Choice>, ProviderError> {
        (**self).option().await
    }

    async fn options(&self) -> Result<Vec<Self::Choice>, ProviderError> {
        (**self).options().await
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        (**self).is_connected().await
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        (**self).connect().await
    }

    fn connection(&self) -> ConnectionStream<Self::Connection> {
        (**self).connection()
    }
}

/// Combinators available on every provider.
pub trait ConnectionProviderExt: ConnectionProvider + Sized {
    /// Transform the payload of `Connected` states with `mapper`.
    fn map_connection<F, N>(self, mapper: F) -> MappedConnectionProvider<Self, F>
    where
        F: Fn(Self::Connection) -> N + Send + Sync + 'static,
        N: Send + 'static,
    {
        MappedConnectionProvider::new(self, mapper)
    }

    /// Transform the options this provider resolves with `mapper`.
    fn map_option<G, T>(self, mapper: G) -> MappedOptionProvider<Self, G>
    where
        G: Fn(Self::Choice) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        MappedOptionProvider::new(self, mapper)
    }

    fn boxed(self) -> Box<DynConnectionProvider<Self::Choice, Self::Connection>>
    where
        Self: 'static,
    {
        Box::new(self)
    }

    fn shared(self) -> Arc<DynConnectionProvider<Self::Choice, Self::Connection>>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<P: ConnectionProvider> ConnectionProviderExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;
    use futures::StreamExt;

    #[tokio::test]
    async fn default_options_lists_the_single_option() {
        let provider = MockProvider::new("injected").with_option("metamask");
        assert_eq!(provider.options().await.unwrap(), vec!["metamask".to_string()]);

        let empty = MockProvider::new("injected");
        assert!(empty.options().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shared_and_boxed_providers_delegate() {
        let provider = Arc::new(MockProvider::new("beacon").with_option("temple"));
        let shared: Arc<DynConnectionProvider<String, u64>> = provider.clone();
        let boxed = ConnectionProviderExt::boxed(Arc::clone(&provider));

        assert_eq!(shared.id(), "beacon");
        assert_eq!(boxed.id(), "beacon");
        assert_eq!(boxed.option().await.unwrap(), Some("temple".to_string()));

        let mut stream = shared.connection();
        shared.connect().await.unwrap();
        assert_eq!(stream.next().await, Some(ConnectionState::Connecting));
        assert_eq!(stream.next().await, Some(ConnectionState::Connected(1)));
        assert_eq!(provider.connect_count(), 1);
    }
}
