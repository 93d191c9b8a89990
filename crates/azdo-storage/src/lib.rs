//! Personal access token storage for azdo-tools.
//!
//! The Azure DevOps PAT is resolved from, in order:
//!
//! 1. the `DEVOPS_PAT` environment variable
//! 2. the OS keychain entry `azure-devops/pat` (service `azdo-tools`)
//!
//! The keychain backend is Keychain Services on macOS, Credential Manager on
//! Windows and Secret Service on Linux.
//!
//! # Example
//!
//! ```ignore
//! use azdo_storage::{resolve_token, KeychainStore};
//!
//! let store = KeychainStore::new();
//! let token = resolve_token(&store, |name| std::env::var(name).ok())?;
//! tracing::info!(source = %token.source, "Using personal access token");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use azdo_core::config::ENV_PAT;
use azdo_core::{Error, Result};
use keyring::Entry;
use tracing::{debug, warn};

/// Service name used in OS keychain.
const SERVICE_NAME: &str = "azdo-tools";

/// Keychain key holding the personal access token.
pub const PAT_KEY: &str = "azure-devops/pat";

/// Secret storage backend.
pub trait CredentialStore: Send + Sync {
    /// Store a secret under `key`, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a secret. `Ok(None)` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Delete a secret. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    fn exists(&self, key: &str) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }
}

// =============================================================================
// KeychainStore
// =============================================================================

/// Credential store backed by the OS keychain.
#[derive(Debug)]
pub struct KeychainStore {
    service_name: String,
}

impl KeychainStore {
    pub fn new() -> Self {
        Self::with_service_name(SERVICE_NAME)
    }

    /// Use a different keychain service name (keeps test entries apart).
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service_name, key)
            .map_err(|e| keychain_error("open keychain entry", key, e))
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

fn keychain_error(action: &str, key: &str, e: keyring::Error) -> Error {
    Error::Storage(format!("Failed to {} '{}': {}", action, key, e))
}

impl CredentialStore for KeychainStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        debug!(key = key, "Writing secret to keychain");
        self.entry(key)?
            .set_password(value)
            .map_err(|e| keychain_error("store secret", key, e))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => {
                debug!(key = key, "No keychain entry");
                Ok(None)
            }
            Err(e) => {
                warn!(key = key, error = %e, "Keychain read failed");
                Err(keychain_error("read secret", key, e))
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keychain_error("delete secret", key, e)),
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory credential store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a personal access token.
    pub fn with_pat(pat: impl Into<String>) -> Self {
        let mut secrets = HashMap::new();
        secrets.insert(PAT_KEY.to_string(), pat.into());
        Self {
            secrets: RwLock::new(secrets),
        }
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Storage(format!("Lock poisoned: {}", e))
}

impl CredentialStore for MemoryStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        self.secrets
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.secrets.read().map_err(poisoned)?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.secrets.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

// =============================================================================
// Token resolution
// =============================================================================

/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keychain,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Environment => write!(f, "environment ({})", ENV_PAT),
            TokenSource::Keychain => write!(f, "keychain ({})", PAT_KEY),
        }
    }
}

/// A personal access token and its origin.
#[derive(Clone)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

impl fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the PAT from the environment, falling back to the store.
pub fn resolve_token<F>(store: &dyn CredentialStore, env: F) -> Result<ResolvedToken>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(ENV_PAT).filter(|v| !v.trim().is_empty()) {
        return Ok(ResolvedToken {
            value: value.trim().to_string(),
            source: TokenSource::Environment,
        });
    }

    match store.get(PAT_KEY)? {
        Some(value) if !value.is_empty() => Ok(ResolvedToken {
            value,
            source: TokenSource::Keychain,
        }),
        _ => Err(Error::Auth(format!(
            "No personal access token found. Set {} or run `azdo-tools token set`",
            ENV_PAT
        ))),
    }
}
