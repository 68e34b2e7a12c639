//! Dictionary-backed authentication
//!
//! Users are configured as `username: <argon2 PHC digest>`. Digests are
//! produced with [`DictionaryProvider::hash_password`] (also available as
//! `restlos hash-password`).

use super::AuthProvider;
use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration parameters of the dictionary provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionaryParams {
    /// Username to password digest
    #[serde(default)]
    pub users: HashMap<String, String>,
}

/// Authenticates against a fixed map of users
#[derive(Debug, Clone, Default)]
pub struct DictionaryProvider {
    users: HashMap<String, String>,
}

impl DictionaryProvider {
    /// Create a provider, rejecting digests that cannot be parsed
    pub fn from_params(params: DictionaryParams) -> Result<Self> {
        for (username, digest) in &params.users {
            PasswordHash::new(digest)
                .map_err(|e| anyhow!("invalid password digest for user {}: {}", username, e))?;
        }

        if params.users.is_empty() {
            tracing::warn!("dictionary provider has no users, every request will be denied");
        }

        Ok(Self {
            users: params.users,
        })
    }

    /// Produce a salted argon2 digest of a password
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
            .map_err(|e| anyhow!("failed to encode salt: {}", e))?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("failed to hash password: {}", e))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn verify_password(digest: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[async_trait]
impl AuthProvider for DictionaryProvider {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(digest) = self.users.get(username).cloned() else {
            return false;
        };
        let password = password.to_owned();

        // argon2 is CPU bound, keep it off the async workers
        tokio::task::spawn_blocking(move || verify_password(&digest, &password))
            .await
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "password verification task failed");
                false
            })
    }
}
