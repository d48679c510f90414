use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload-free tag of a [`ConnectionState`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        ConnectionStatus::Disconnected
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Snapshot of a connection's lifecycle.
///
/// Serialized as `{"status": "connected", "connection": ...}`; the other two
/// variants carry only the `status` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "connection", rename_all = "lowercase")]
pub enum ConnectionState<C> {
    /// No active or pending connection.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// Established connection carrying the provider-specific payload.
    Connected(C),
}

impl<C> Default for ConnectionState<C> {
    fn default() -> Self {
        ConnectionState::Disconnected
    }
}

impl<C> ConnectionState<C> {
    /// Transform the payload of a `Connected` state.
    ///
    /// `f` is only invoked for `Connected`; the other variants are rebuilt
    /// untouched.
    pub fn map<N, F>(self, f: F) -> ConnectionState<N>
    where
        F: FnOnce(C) -> N,
    {
        match self {
            ConnectionState::Disconnected => ConnectionState::Disconnected,
            ConnectionState::Connecting => ConnectionState::Connecting,
            ConnectionState::Connected(connection) => ConnectionState::Connected(f(connection)),
        }
    }

    pub fn as_ref(&self) -> ConnectionState<&C> {
        match self {
            ConnectionState::Disconnected => ConnectionState::Disconnected,
            ConnectionState::Connecting => ConnectionState::Connecting,
            ConnectionState::Connected(connection) => ConnectionState::Connected(connection),
        }
    }

    /// Borrow the payload if connected.
    pub fn connection(&self) -> Option<&C> {
        match self {
            ConnectionState::Connected(connection) => Some(connection),
            _ => None,
        }
    }

    pub fn into_connection(self) -> Option<C> {
        match self {
            ConnectionState::Connected(connection) => Some(connection),
            _ => None,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        match self {
            ConnectionState::Disconnected => ConnectionStatus::Disconnected,
            ConnectionState::Connecting => ConnectionStatus::Connecting,
            ConnectionState::Connected(_) => ConnectionStatus::Connected,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectionState::Disconnected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

impl<C> From<Option<C>> for ConnectionState<C> {
    fn from(connection: Option<C>) -> Self {
        match connection {
            Some(connection) => ConnectionState::Connected(connection),
            None => ConnectionState::Disconnected,
        }
    }
}
