//! Directory (LDAP) authentication
//!
//! Every attempt opens its own connection: bind as the user, then, when
//! required groups are configured, search for a group entry listing the
//! user's DN. No session is kept between attempts.

use super::AuthProvider;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, dn_escape, ldap_escape};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_group_filter() -> String {
    "(&(cn={group})(|(member={dn})(uniqueMember={dn})))".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

/// Configuration parameters of the directory provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryParams {
    /// Server URL, e.g. `ldaps://ldap.example.com`
    pub url: String,

    /// DN template, `{username}` is replaced by the escaped username
    pub bind_dn: String,

    /// At least one of these groups is required when non-empty
    #[serde(default)]
    pub required_groups: Vec<String>,

    /// Search base for group entries
    #[serde(default)]
    pub group_base: String,

    /// Group filter template with `{group}` and `{dn}` placeholders
    #[serde(default = "default_group_filter")]
    pub group_filter: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Authenticates by binding to a directory server
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    params: DirectoryParams,
}

impl DirectoryProvider {
    pub fn new(params: DirectoryParams) -> Result<Self> {
        if !params.bind_dn.contains("{username}") {
            return Err(anyhow!("bind_dn must contain the {{username}} placeholder"));
        }
        if !params.required_groups.is_empty() && params.group_base.is_empty() {
            return Err(anyhow!("group_base is required when required_groups is set"));
        }
        Ok(Self { params })
    }

    /// DN to bind as for a username
    pub fn user_dn(&self, username: &str) -> String {
        self.params
            .bind_dn
            .replace("{username}", &dn_escape(username))
    }

    /// Search filter checking membership of `dn` in `group`
    pub fn group_filter(&self, group: &str, dn: &str) -> String {
        self.params
            .group_filter
            .replace("{group}", &ldap_escape(group))
            .replace("{dn}", &ldap_escape(dn))
    }

    async fn try_authenticate(&self, username: &str, password: &str) -> Result<bool, LdapError> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.params.connect_timeout_secs));
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.params.url).await?;
        tokio::spawn(async move {
            if let Err(err) = conn.drive().await {
                tracing::debug!(error = %err, "directory connection closed with error");
            }
        });

        let dn = self.user_dn(username);
        ldap.simple_bind(&dn, password).await?.success()?;

        let granted = if self.params.required_groups.is_empty() {
            true
        } else {
            self.is_member(&mut ldap, &dn).await?
        };

        let _ = ldap.unbind().await;
        Ok(granted)
    }

    async fn is_member(&self, ldap: &mut Ldap, dn: &str) -> Result<bool, LdapError> {
        for group in &self.params.required_groups {
            let filter = self.group_filter(group, dn);
            let (entries, _) = ldap
                .search(&self.params.group_base, Scope::Subtree, &filter, vec!["dn"])
                .await?
                .success()?;
            if !entries.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl AuthProvider for DirectoryProvider {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        // an empty password would be an anonymous bind
        if username.is_empty() || password.is_empty() {
            return false;
        }

        match self.try_authenticate(username, password).await {
            Ok(granted) => granted,
            Err(err) => {
                tracing::debug!(username, error = %err, "directory authentication failed");
                false
            }
        }
    }
}
