//! Credentials and their persistence
//!
//! A client is built from an explicitly passed `Credentials` value. Where
//! those credentials live between runs is the job of a `CredentialStore`
//! implementation; the client itself never reads ambient state.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Default region used when none is given
pub const DEFAULT_REGION: &str = "nyc3";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Access key pair plus the region it is used against
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Storage region, e.g. "nyc3"
    #[serde(default = "default_region")]
    pub region: String,
}

impl Credentials {
    /// Create credentials for the given region
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("region", &self.region)
            .finish()
    }
}

/// Persistence for a single set of credentials
///
/// `get` after `put` returns the stored value until the next `put` or `clear`.
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials, if any
    fn get(&self) -> Result<Option<Credentials>>;

    /// Store credentials, replacing any previous value
    fn put(&self, credentials: Credentials) -> Result<()>;

    /// Remove stored credentials
    fn clear(&self) -> Result<()>;

    /// Load the stored credentials or fail with `Error::NotLoggedIn`
    fn require(&self) -> Result<Credentials> {
        self.get()?.ok_or(Error::NotLoggedIn)
    }
}

/// Credential store backed by the `[spaces_credentials]` table of the config file
#[derive(Debug)]
pub struct FileCredentialStore {
    config_manager: ConfigManager,
}

impl FileCredentialStore {
    /// Create a store with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credentials>> {
        let config = self.config_manager.load()?;
        tracing::debug!(found = config.credentials.is_some(), "loaded stored credentials");
        Ok(config.credentials)
    }

    fn put(&self, credentials: Credentials) -> Result<()> {
        let mut config = self.config_manager.load()?;
        config.credentials = Some(credentials);
        self.config_manager.save(&config)
    }

    fn clear(&self) -> Result<()> {
        let mut config = self.config_manager.load()?;
        if config.credentials.take().is_none() {
            return Ok(());
        }
        self.config_manager.save(&config)
    }
}

/// In-process credential store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Credentials>>> {
        self.slot
            .lock()
            .map_err(|_| Error::General("credential store lock poisoned".into()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credentials>> {
        Ok(self.lock()?.clone())
    }

    fn put(&self, credentials: Credentials) -> Result<()> {
        *self.lock()? = Some(credentials);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
