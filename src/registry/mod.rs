mod config;
pub use config::RegistryConfig;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::provider::{ConnectionProvider, DynConnectionProvider};

/// Shared handle to a registered provider
pub type SharedProvider<O, C> = Arc<DynConnectionProvider<O, C>>;

/// Errors that can occur when working with the provider registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// A provider with this id is already registered
    AlreadyRegistered(String),
    /// No provider registered under this id
    NotFound(String),
    /// The registry holds `max_providers` providers already
    CapacityReached(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered(id) => write!(f, "Provider {} already registered", id),
            Self::NotFound(id) => write!(f, "No provider registered as {}", id),
            Self::CapacityReached(max) => {
                write!(f, "Registry is full ({} providers)", max)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Providers of one option type and one connection type, keyed by id.
///
/// Heterogeneous wallet integrations are brought to common types with the
/// mappers before being registered.
pub struct ProviderRegistry<O, C> {
    providers: RwLock<BTreeMap<String, SharedProvider<O, C>>>,
    config: RegistryConfig,
}

impl<O, C> ProviderRegistry<O, C>
where
    O: Send + 'static,
    C: Send + 'static,
{
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(BTreeMap::new()),
            config: RegistryConfig::default(),
        }
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            providers: RwLock::new(BTreeMap::new()),
            config,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a provider under its own id
    pub async fn register(&self, provider: SharedProvider<O, C>) -> Result<(), RegistryError> {
        if self.config.allow_replace {
            self.register_or_replace(provider).await?;
            return Ok(());
        }

        let id = provider.id().to_string();
        let mut providers = self.providers.write().await;

        if providers.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        if providers.len() >= self.config.max_providers {
            return Err(RegistryError::CapacityReached(self.config.max_providers));
        }

        info!("Registering provider {}", id);
        providers.insert(id, provider);
        Ok(())
    }

    /// Register a provider, replacing any provider with the same id
    ///
    /// Returns the replaced provider
    pub async fn register_or_replace(
        &self,
        provider: SharedProvider<O, C>,
    ) -> Result<Option<SharedProvider<O, C>>, RegistryError> {
        let id = provider.id().to_string();
        let mut providers = self.providers.write().await;

        if !providers.contains_key(&id) && providers.len() >= self.config.max_providers {
            return Err(RegistryError::CapacityReached(self.config.max_providers));
        }

        let replaced = providers.insert(id.clone(), provider);
        if replaced.is_some() {
            info!("Replaced provider {}", id);
        } else {
            info!("Registering provider {}", id);
        }
        Ok(replaced)
    }

    pub async fn get(&self, id: &str) -> Result<SharedProvider<O, C>, RegistryError> {
        let providers = self.providers.read().await;
        providers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.providers.read().await.contains_key(id)
    }

    pub async fn remove(&self, id: &str) -> Option<SharedProvider<O, C>> {
        let removed = self.providers.write().await.remove(id);
        if removed.is_some() {
            info!("Removed provider {}", id);
        }
        removed
    }

    /// Registered ids, sorted
    pub async fn ids(&self) -> Vec<String> {
        self.providers.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.providers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.providers.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.providers.write().await.clear();
    }

    /// Every option offered by the registered providers, tagged with the
    /// provider id.
    ///
    /// A provider whose query fails is skipped.
    pub async fn available_options(&self) -> Vec<(String, O)> {
        let mut available = Vec::new();

        for (id, provider) in self.snapshot().await {
            match provider.options().await {
                Ok(options) => {
                    debug!("Provider {} offers {} options", id, options.len());
                    available.extend(options.into_iter().map(|option| (id.clone(), option)));
                }
                Err(e) => warn!("Skipping options of provider {}: {}", id, e),
            }
        }

        available
    }

    /// First provider, in id order, that connects without user action
    pub async fn auto_connected(&self) -> Option<SharedProvider<O, C>> {
        for (id, provider) in self.snapshot().await {
            match provider.is_auto_connected().await {
                Ok(true) => return Some(provider),
                Ok(false) => {}
                Err(e) => warn!("Auto-connect check failed for provider {}: {}", id, e),
            }
        }
        None
    }

    /// Providers holding a session that can be resumed without prompting
    pub async fn restorable(&self) -> Vec<SharedProvider<O, C>> {
        let mut restorable = Vec::new();

        for (id, provider) in self.snapshot().await {
            match provider.is_connected().await {
                Ok(true) => restorable.push(provider),
                Ok(false) => {}
                Err(e) => warn!("Session check failed for provider {}: {}", id, e),
            }
        }

        restorable
    }

    // Provider queries must run without the lock held.
    async fn snapshot(&self) -> Vec<(String, SharedProvider<O, C>)> {
        self.providers
            .read()
            .await
            .iter()
            .map(|(id, provider)| (id.clone(), Arc::clone(provider)))
            .collect()
    }
}

impl<O, C> Default for ProviderRegistry<O, C>
where
    O: Send + 'static,
    C: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<O, C> fmt::Debug for ProviderRegistry<O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &"<opaque>")
            .field("config", &self.config)
            .finish()
    }
}
