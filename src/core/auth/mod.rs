//! Authentication for every API operation
//!
//! Credentials arrive as HTTP Basic username/password pairs and are checked
//! by exactly one provider, chosen at startup from configuration:
//! - `dictionary`: local users with argon2 password digests
//! - `directory`: LDAP bind, optionally followed by a group membership check
//!   (requires the `ldap` feature)
//!
//! A configuration that cannot be resolved never disables authentication:
//! the gate falls back to an empty dictionary, which denies everyone.

pub mod dictionary;
#[cfg(feature = "ldap")]
pub mod directory;

pub use dictionary::{DictionaryParams, DictionaryProvider};
#[cfg(feature = "ldap")]
pub use directory::{DirectoryParams, DirectoryProvider};

use crate::core::error::{ApiError, ApiResult};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Trait for credential verifiers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Check a username/password pair
    ///
    /// Failures of the backing service count as a denial.
    async fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Username/password pair presented by a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The authenticated user of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Dictionary,
    Directory,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dictionary" | "dict" => Ok(ProviderKind::Dictionary),
            "directory" | "ldap" => Ok(ProviderKind::Directory),
            other => Err(anyhow!("unknown authentication provider: {}", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Dictionary => f.write_str("dictionary"),
            ProviderKind::Directory => f.write_str("directory"),
        }
    }
}

/// Build a provider from its configured identifier and parameters
pub fn build_provider(provider: &str, params: &Value) -> Result<(ProviderKind, Arc<dyn AuthProvider>)> {
    let kind: ProviderKind = provider.parse()?;
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params.clone()
    };

    let built: Arc<dyn AuthProvider> = match kind {
        ProviderKind::Dictionary => {
            let params: DictionaryParams = serde_json::from_value(params)
                .map_err(|e| anyhow!("invalid dictionary provider parameters: {}", e))?;
            Arc::new(DictionaryProvider::from_params(params)?)
        }
        #[cfg(feature = "ldap")]
        ProviderKind::Directory => {
            let params: DirectoryParams = serde_json::from_value(params)
                .map_err(|e| anyhow!("invalid directory provider parameters: {}", e))?;
            Arc::new(DirectoryProvider::new(params)?)
        }
        #[cfg(not(feature = "ldap"))]
        ProviderKind::Directory => {
            return Err(anyhow!(
                "directory provider requested but restlos was built without the `ldap` feature"
            ));
        }
    };

    Ok((kind, built))
}

/// Gate wrapping the configured provider
#[derive(Clone)]
pub struct AuthGate {
    kind: ProviderKind,
    provider: Arc<dyn AuthProvider>,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate").field("kind", &self.kind).finish()
    }
}

impl AuthGate {
    pub fn new(kind: ProviderKind, provider: Arc<dyn AuthProvider>) -> Self {
        Self { kind, provider }
    }

    /// Resolve the configured provider, falling back to a deny-all dictionary
    pub fn from_config(provider: &str, params: &Value) -> Self {
        match build_provider(provider, params) {
            Ok((kind, provider)) => {
                tracing::info!(provider = %kind, "authentication provider ready");
                Self { kind, provider }
            }
            Err(err) => {
                tracing::error!(
                    provider,
                    error = %err,
                    "unable to set up authentication provider, falling back to the default dictionary provider"
                );
                Self::fallback()
            }
        }
    }

    /// The default provider: a dictionary without users
    pub fn fallback() -> Self {
        Self {
            kind: ProviderKind::Dictionary,
            provider: Arc::new(DictionaryProvider::default()),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Authenticate presented credentials
    pub async fn check(&self, credentials: Option<&Credentials>) -> ApiResult<Principal> {
        let Some(credentials) = credentials else {
            return Err(ApiError::Unauthorized);
        };

        if self
            .provider
            .authenticate(&credentials.username, &credentials.password)
            .await
        {
            Ok(Principal(credentials.username.clone()))
        } else {
            tracing::info!(username = %credentials.username, "authentication failed");
            Err(ApiError::Unauthorized)
        }
    }
}
