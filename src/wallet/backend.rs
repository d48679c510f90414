use async_trait::async_trait;

use crate::error::ProviderError;

/// Binding to one wallet technology (browser extension, mobile deep link,
/// dedicated SDK).
///
/// This is the only surface a wallet integration has to implement; the
/// connection lifecycle around it is handled by
/// [`WalletProvider`](super::WalletProvider).
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Connection option the wallet exposes, e.g. the detected extension.
    type Choice: Clone + Send + Sync + 'static;
    /// Session handle produced by a successful handshake.
    type Session: Clone + Send + Sync + 'static;

    /// Look for the wallet in the environment.
    async fn detect(&self) -> Result<Option<Self::Choice>, ProviderError>;

    /// Whether the user already authorised this application and the session
    /// has not expired.
    async fn is_enabled(&self) -> Result<bool, ProviderError>;

    /// Run the handshake, prompting the user when needed.
    async fn enable(&self, option: &Self::Choice) -> Result<Self::Session, ProviderError>;

    /// Release the session on the wallet side.
    async fn disable(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Whether the wallet is connected without user action (injected mobile
    /// browsers, ...).
    fn auto_connects(&self) -> bool {
        false
    }
}
