use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::{ConnectionProvider, ConnectionStream};

/// Provider whose resolved options are rewritten by a mapping function.
///
/// A source resolving to "no option" stays "no option"; the mapper is never
/// called for it.
pub struct MappedOptionProvider<P, G> {
    source: P,
    mapper: Arc<G>,
}

impl<P, G> MappedOptionProvider<P, G> {
    pub fn new(source: P, mapper: G) -> Self {
        Self {
            source,
            mapper: Arc::new(mapper),
        }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn into_source(self) -> P {
        self.source
    }
}

impl<P, G> fmt::Debug for MappedOptionProvider<P, G>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedOptionProvider")
            .field("source", &self.source)
            .field("mapper", &"<fn>")
            .finish()
    }
}

#[async_trait]
impl<P, G, T> ConnectionProvider for MappedOptionProvider<P, G>
where
    P: ConnectionProvider,
    G: Fn(P::Choice) -> T + Send + Sync + 'static,
    T: Send + 'static,
{
    type Choice = T;
    type Connection = P::Connection;

    fn id(&self) -> &str {
        self.source.id()
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        self.source.is_auto_connected().await
    }

    async fn option(&self) -> Result<Option<T>, ProviderError> {
        Ok(self.source.option().await?.map(|option| (*self.mapper)(option)))
    }

    async fn options(&self) -> Result<Vec<T>, ProviderError> {
        Ok(self
            .source
            .options()
            .await?
            .into_iter()
            .map(|option| (*self.mapper)(option))
            .collect())
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        self.source.is_connected().await
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        self.source.connect().await
    }

    fn connection(&self) -> ConnectionStream<Self::Connection> {
        self.source.connection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ConnectionProviderExt;
    use crate::testing::MockProvider;
    use crate::types::ConnectionState;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct WalletOption {
        provider: &'static str,
        name: String,
    }

    #[tokio::test]
    async fn absent_option_is_preserved() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mapped = MockProvider::new("injected").map_option(move |name: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            name.len()
        });

        assert_eq!(mapped.option().await.unwrap(), None);
        assert!(mapped.options().await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn present_option_is_transformed() {
        let mapped = MockProvider::new("injected")
            .with_option("metamask")
            .map_option(|name: String| WalletOption {
                provider: "injected",
                name,
            });

        assert_eq!(
            mapped.option().await.unwrap(),
            Some(WalletOption {
                provider: "injected",
                name: "metamask".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn stream_and_flags_pass_through() {
        let source = Arc::new(MockProvider::new("mobile").with_auto_connected(true));
        let mapped = Arc::clone(&source).map_option(|name: String| name.to_uppercase());

        assert_eq!(mapped.id(), "mobile");
        assert!(mapped.is_auto_connected().await.unwrap());
        assert!(!mapped.is_connected().await.unwrap());

        let mut stream = mapped.connection();
        mapped.connect().await.unwrap();
        assert_eq!(stream.next().await, Some(ConnectionState::Connecting));
        assert_eq!(stream.next().await, Some(ConnectionState::Connected(1)));
        assert_eq!(source.connect_count(), 1);
    }

    #[tokio::test]
    async fn query_errors_pass_through_unchanged() {
        let mapped = MockProvider::new("broken")
            .failing_queries("extension crashed")
            .map_option(|name: String| name);

        match mapped.option().await {
            Err(ProviderError::Query(msg)) => assert_eq!(msg, "extension crashed"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
