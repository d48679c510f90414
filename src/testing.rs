// Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::StreamExt;

use crate::channel::StateChannel;
use crate::error::ProviderError;
use crate::provider::{ConnectionProvider, ConnectionStream};
use crate::types::ConnectionState;

/// Root provider whose `connect` immediately succeeds with the attempt number
/// as payload.
pub(crate) struct MockProvider {
    id: String,
    option: Option<String>,
    auto_connected: bool,
    session: bool,
    query_error: Option<String>,
    channel: StateChannel<u64>,
    connects: AtomicU64,
}

impl MockProvider {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            option: None,
            auto_connected: false,
            session: false,
            query_error: None,
            channel: StateChannel::default(),
            connects: AtomicU64::new(0),
        }
    }

    pub(crate) fn with_option(mut self, option: &str) -> Self {
        self.option = Some(option.to_string());
        self
    }

    pub(crate) fn with_auto_connected(mut self, auto: bool) -> Self {
        self.auto_connected = auto;
        self
    }

    pub(crate) fn with_session(mut self, session: bool) -> Self {
        self.session = session;
        self
    }

    pub(crate) fn failing_queries(mut self, reason: &str) -> Self {
        self.query_error = Some(reason.to_string());
        self
    }

    pub(crate) fn connect_count(&self) -> u64 {
        self.connects.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ProviderError> {
        match &self.query_error {
            Some(reason) => Err(ProviderError::Query(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConnectionProvider for MockProvider {
    type Choice = String;
    type Connection = u64;

    fn id(&self) -> &str {
        &self.id
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        self.check()?;
        Ok(self.auto_connected)
    }

    async fn option(&self) -> Result<Option<String>, ProviderError> {
        self.check()?;
        Ok(self.option.clone())
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        self.check()?;
        Ok(self.session)
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        self.channel.publish(ConnectionState::Connecting);
        self.channel.publish(ConnectionState::Connected(attempt));
        Ok(())
    }

    fn connection(&self) -> ConnectionStream<u64> {
        self.channel.subscribe()
    }
}

/// Provider replaying a fixed state sequence to every subscriber.
pub(crate) struct ScriptedProvider {
    script: Vec<ConnectionState<u64>>,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Vec<ConnectionState<u64>>) -> Self {
        Self { script }
    }
}

#[async_trait]
impl ConnectionProvider for ScriptedProvider {
    type Choice = String;
    type Connection = u64;

    fn id(&self) -> &str {
        "scripted"
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }

    async fn option(&self) -> Result<Option<String>, ProviderError> {
        Ok(Some("scripted".to_string()))
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn connection(&self) -> ConnectionStream<u64> {
        futures::stream::iter(self.script.clone()).boxed()
    }
}
