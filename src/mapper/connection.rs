use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::{ConnectionProvider, ConnectionStream};

/// Provider whose `Connected` payloads are rewritten by a mapping function.
///
/// The mapper runs lazily, once per `Connected` emission and per subscriber.
/// Results are not memoized; an expensive mapper should cache on its own.
pub struct MappedConnectionProvider<P, F> {
    source: P,
    mapper: Arc<F>,
}

impl<P, F> MappedConnectionProvider<P, F> {
    pub fn new(source: P, mapper: F) -> Self {
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

impl<P, F> fmt::Debug for MappedConnectionProvider<P, F>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedConnectionProvider")
            .field("source", &self.source)
            .field("mapper", &"<fn>")
            .finish()
    }
}

#[async_trait]
impl<P, F, N> ConnectionProvider for MappedConnectionProvider<P, F>
where
    P: ConnectionProvider,
    F: Fn(P::Connection) -> N + Send + Sync + 'static,
    N: Send + 'static,
{
    type Choice = P::Choice;
    type Connection = N;

    fn id(&self) -> &str {
        self.source.id()
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        self.source.is_auto_connected().await
    }

    async fn option(&self) -> Result<Option<Self::Choice>, ProviderError> {
        self.source.option().await
    }

    async fn options(&self) -> Result<Vec<Self::Choice>, ProviderError> {
        self.source.options().await
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        self.source.is_connected().await
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        debug!("Forwarding connect to source provider {}", self.source.id());
        self.source.connect().await
    }

    fn connection(&self) -> ConnectionStream<N> {
        let mapper = Arc::clone(&self.mapper);
        self.source
            .connection()
            .map(move |state| state.map(|connection| (*mapper)(connection)))
            .boxed()
    }
}
