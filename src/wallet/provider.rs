use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::channel::StateChannel;
use crate::error::ProviderError;
use crate::provider::{ConnectionProvider, ConnectionStream};
use crate::types::ConnectionState;
use crate::wallet::backend::WalletBackend;
use crate::wallet::types::WalletProviderConfig;

/// Root provider driving the connection lifecycle of a [`WalletBackend`].
///
/// A failed attempt always brings the stream back to `Disconnected`; errors
/// are returned from [`ConnectionProvider::connect`] and never pushed on the
/// stream.
pub struct WalletProvider<B: WalletBackend> {
    /// Wallet SDK binding
    backend: B,

    /// Configuration parameters
    config: WalletProviderConfig,

    /// Connection states fanned out to subscribers
    channel: StateChannel<B::Session>,

    /// Bumped by every `connect` start and every `disconnect`; only changed
    /// while the channel lock is held
    attempt: AtomicU64,
}

impl<B: WalletBackend> WalletProvider<B> {
    pub fn new(backend: B, config: WalletProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let channel = StateChannel::new(config.channel_capacity)?;

        info!("Initialized wallet provider {}", config.id);
        Ok(Self {
            backend,
            config,
            channel,
            attempt: AtomicU64::new(0),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &WalletProviderConfig {
        &self.config
    }

    /// Latest published state.
    pub fn state(&self) -> ConnectionState<B::Session> {
        self.channel.current()
    }

    /// Release the session and publish `Disconnected`.
    ///
    /// A handshake still in flight is discarded when it completes.
    pub async fn disconnect(&self) -> Result<(), ProviderError> {
        if self.channel.current().is_disconnected() {
            debug!("Provider {} already disconnected", self.config.id);
            return Ok(());
        }

        let released = self.backend.disable().await;
        self.channel.transition(|_| {
            self.attempt.fetch_add(1, Ordering::SeqCst);
            Some(ConnectionState::Disconnected)
        });
        info!("Provider {} disconnected", self.config.id);
        released
    }

    /// Publish the outcome of attempt `attempt`, unless a later `connect` or
    /// a `disconnect` superseded it.
    fn settle(&self, attempt: u64, outcome: ConnectionState<B::Session>) -> bool {
        self.channel.transition(|state| {
            let current = self.attempt.load(Ordering::SeqCst) == attempt;
            (current && state.is_connecting()).then_some(outcome)
        })
    }

    fn abort_attempt(&self, attempt: u64, reason: &ProviderError) {
        warn!("Connection attempt on {} failed: {}", self.config.id, reason);
        if !self.settle(attempt, ConnectionState::Disconnected) {
            debug!("Failed attempt {} on {} was already superseded", attempt, self.config.id);
        }
    }
}

#[async_trait]
impl<B: WalletBackend> ConnectionProvider for WalletProvider<B> {
    type Choice = B::Choice;
    type Connection = B::Session;

    fn id(&self) -> &str {
        &self.config.id
    }

    async fn is_auto_connected(&self) -> Result<bool, ProviderError> {
        Ok(self.backend.auto_connects())
    }

    async fn option(&self) -> Result<Option<B::Choice>, ProviderError> {
        self.backend.detect().await
    }

    async fn is_connected(&self) -> Result<bool, ProviderError> {
        if self.channel.current().is_connected() {
            return Ok(true);
        }
        self.backend.is_enabled().await
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        let mut attempt = 0;
        let started = self.channel.transition(|state| {
            if !state.is_disconnected() {
                return None;
            }
            attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
            Some(ConnectionState::Connecting)
        });
        if !started {
            debug!(
                "Provider {} is already {}, ignoring connect",
                self.config.id,
                self.channel.current().status()
            );
            return Ok(());
        }

        let option = match self.backend.detect().await {
            Ok(Some(option)) => option,
            Ok(None) => {
                let error = ProviderError::OptionUnavailable;
                self.abort_attempt(attempt, &error);
                return Err(error);
            }
            Err(error) => {
                self.abort_attempt(attempt, &error);
                return Err(error);
            }
        };

        match self.backend.enable(&option).await {
            Ok(session) => {
                if self.settle(attempt, ConnectionState::Connected(session)) {
                    info!("Provider {} connected", self.config.id);
                } else {
                    debug!(
                        "Attempt {} on {} was superseded during the handshake, discarding session",
                        attempt, self.config.id
                    );
                }
                Ok(())
            }
            Err(error) => {
                self.abort_attempt(attempt, &error);
                Err(error)
            }
        }
    }

    fn connection(&self) -> ConnectionStream<B::Session> {
        self.channel.subscribe()
    }
}
