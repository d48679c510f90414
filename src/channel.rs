//! Hot, multi-subscriber state broadcaster for root providers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::{future, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{trace, warn};

use crate::error::ProviderError;
use crate::provider::ConnectionStream;
use crate::types::ConnectionState;

/// Number of states buffered per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Broadcasts connection states to any number of subscribers.
///
/// Delivery is replay-free: a subscriber only sees states published after it
/// subscribed. The latest published state is kept as a snapshot for
/// [`StateChannel::current`].
pub struct StateChannel<C> {
    sender: broadcast::Sender<ConnectionState<C>>,
    current: Mutex<ConnectionState<C>>,
}

impl<C> StateChannel<C>
where
    C: Clone + Send + 'static,
{
    pub fn new(capacity: usize) -> Result<Self, ProviderError> {
        if capacity == 0 {
            return Err(ProviderError::Configuration(
                "State channel capacity must be greater than zero".to_string(),
            ));
        }

        let (sender, _) = broadcast::channel(capacity);
        Ok(Self {
            sender,
            current: Mutex::new(ConnectionState::Disconnected),
        })
    }

    /// Register a new subscriber. Has no effect on the connection itself.
    pub fn subscribe(&self) -> ConnectionStream<C> {
        BroadcastStream::new(self.sender.subscribe())
            .filter_map(|received| {
                future::ready(match received {
                    Ok(state) => Some(state),
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!("State subscriber lagged behind, skipped {} states", skipped);
                        None
                    }
                })
            })
            .boxed()
    }

    /// Record `state` as current and deliver it to every subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, state: ConnectionState<C>) -> usize {
        let mut current = self.lock();
        self.store_and_send(&mut current, state)
    }

    /// Compare-and-set on the current state.
    ///
    /// `decide` sees the current state and returns the next one, or `None` to
    /// leave it unchanged. Returns whether a state was published.
    pub fn transition<F>(&self, decide: F) -> bool
    where
        F: FnOnce(&ConnectionState<C>) -> Option<ConnectionState<C>>,
    {
        let mut current = self.lock();
        match decide(&current) {
            Some(next) => {
                self.store_and_send(&mut current, next);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> ConnectionState<C> {
        self.lock().clone()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn store_and_send(
        &self,
        current: &mut MutexGuard<'_, ConnectionState<C>>,
        state: ConnectionState<C>,
    ) -> usize {
        trace!("Publishing connection state {}", state.status());
        **current = state.clone();
        // Sending only fails when nobody is subscribed.
        self.sender.send(state).unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState<C>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> Default for StateChannel<C>
where
    C: Clone + Send + 'static,
{
    fn default() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            sender,
            current: Mutex::new(ConnectionState::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            StateChannel::<u8>::new(0),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn subscribers_receive_identical_sequences() {
        let channel = StateChannel::<u32>::default();
        let first = channel.subscribe();
        let second = channel.subscribe();
        assert_eq!(channel.receiver_count(), 2);

        channel.publish(ConnectionState::Connecting);
        channel.publish(ConnectionState::Connected(5));
        channel.publish(ConnectionState::Disconnected);

        let expected = vec![
            ConnectionState::Connecting,
            ConnectionState::Connected(5),
            ConnectionState::Disconnected,
        ];
        assert_eq!(first.take(3).collect::<Vec<_>>().await, expected);
        assert_eq!(second.take(3).collect::<Vec<_>>().await, expected);
    }

    #[tokio::test]
    async fn late_subscribers_get_no_replay() {
        let channel = StateChannel::<u32>::default();
        assert_eq!(channel.publish(ConnectionState::Connected(1)), 0);
        assert_eq!(channel.current(), ConnectionState::Connected(1));

        let mut late = channel.subscribe();
        channel.publish(ConnectionState::Disconnected);
        assert_eq!(late.next().await, Some(ConnectionState::Disconnected));
    }

    #[tokio::test]
    async fn lagging_subscriber_keeps_receiving() {
        let channel = StateChannel::<u32>::new(2).unwrap();
        let mut stream = channel.subscribe();
        for n in 0..5 {
            channel.publish(ConnectionState::Connected(n));
        }
        assert_eq!(stream.next().await, Some(ConnectionState::Connected(3)));
        assert_eq!(stream.next().await, Some(ConnectionState::Connected(4)));
    }

    #[test]
    fn transition_only_publishes_when_decided() {
        let channel = StateChannel::<u32>::default();
        let started = channel.transition(|state| {
            state.is_disconnected().then_some(ConnectionState::Connecting)
        });
        assert!(started);
        let again = channel.transition(|state| {
            state.is_disconnected().then_some(ConnectionState::Connecting)
        });
        assert!(!again);
        assert_eq!(channel.current(), ConnectionState::Connecting);
    }
}
