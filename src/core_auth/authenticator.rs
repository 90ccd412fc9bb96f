use crate::config::AuthConfig;
use crate::core_auth::core_auth::PasswdEntry;
use crate::core_auth::helper::{load_passwd_file, verify_password};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Credential check used by PASS.
///
/// Implementations that do expensive work (password hashing) must keep it off
/// the async worker threads.
#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    async fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Plain username/password pairs held in memory.
#[derive(Debug, Default, Clone)]
pub struct StaticAuthenticator {
    users: HashMap<String, String>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// Users from a `username:bcrypt-hash` file.
#[derive(Debug, Clone)]
pub struct PasswdAuthenticator {
    entries: HashMap<String, PasswdEntry>,
}

impl PasswdAuthenticator {
    pub fn from_file(path: &Path) -> Result<Self> {
        let entries = load_passwd_file(path)?;
        info!("Loaded {} user(s) from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    pub fn from_entries(entries: HashMap<String, PasswdEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl Authenticator for PasswdAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(entry) = self.entries.get(username) else {
            debug!("Unknown user: {}", username);
            return false;
        };

        // bcrypt is deliberately slow; run it on the blocking pool
        let password = password.to_string();
        let hashed_password = entry.get_hashed_password().to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password))
            .await
            .unwrap_or_else(|e| {
                error!("Password verification task failed: {}", e);
                false
            })
    }
}

/// Accepts a login if any inner authenticator does.
#[derive(Debug, Default)]
pub struct ChainAuthenticator {
    inner: Vec<Arc<dyn Authenticator>>,
}

impl ChainAuthenticator {
    pub fn new(inner: Vec<Arc<dyn Authenticator>>) -> Self {
        Self { inner }
    }

    /// Builds the chain described by `[auth]`: the passwd file first, then inline users.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let mut inner: Vec<Arc<dyn Authenticator>> = Vec::new();

        if let Some(path) = &config.passwd_file {
            inner.push(Arc::new(PasswdAuthenticator::from_file(path)?));
        }

        if !config.users.is_empty() {
            let users = config
                .users
                .iter()
                .fold(StaticAuthenticator::new(), |acc, user| {
                    acc.with_user(&user.username, &user.password)
                });
            inner.push(Arc::new(users));
        }

        Ok(Self { inner })
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl Authenticator for ChainAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        for auth in &self.inner {
            if auth.authenticate(username, password).await {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserEntry;
    use crate::core_auth::helper::parse_passwd;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_static_authenticator() {
        let auth = StaticAuthenticator::new().with_user("test", "1234");
        assert!(auth.authenticate("test", "1234").await);
        assert!(!auth.authenticate("test", "4321").await);
        assert!(!auth.authenticate("nobody", "1234").await);
    }

    #[tokio::test]
    async fn test_passwd_authenticator() {
        let hashed = bcrypt::hash("hunter2", 4).unwrap();
        let entries = parse_passwd(&format!("alice:{}\n", hashed));
        let auth = PasswdAuthenticator::from_entries(entries);
        assert!(auth.authenticate("alice", "hunter2").await);
        assert!(!auth.authenticate("alice", "hunter3").await);
        assert!(!auth.authenticate("bob", "hunter2").await);
    }

    // Single-threaded on purpose: the ticker only advances if verification
    // leaves the runtime thread free.
    #[tokio::test(flavor = "current_thread")]
    async fn test_password_check_does_not_stall_other_tasks() {
        let hashed = bcrypt::hash("hunter2", bcrypt::DEFAULT_COST).unwrap();
        let entries = parse_passwd(&format!("alice:{}\n", hashed));
        let auth = PasswdAuthenticator::from_entries(entries);

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        assert!(auth.authenticate("alice", "hunter2").await);
        assert!(!auth.authenticate("alice", "wrong").await);
        let observed = ticks.load(Ordering::SeqCst);
        ticker.abort();

        assert!(observed >= 3, "ticker advanced only {} times", observed);
    }

    #[tokio::test]
    async fn test_chain_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let passwd = dir.path().join("passwd");
        let hashed = bcrypt::hash("filepass", 4).unwrap();
        std::fs::write(&passwd, format!("fileuser:{}\n", hashed)).unwrap();

        let config = AuthConfig {
            passwd_file: Some(passwd),
            users: vec![UserEntry {
                username: "test".to_string(),
                password: "1234".to_string(),
            }],
        };
        let auth = ChainAuthenticator::from_config(&config).unwrap();
        assert!(auth.authenticate("fileuser", "filepass").await);
        assert!(auth.authenticate("test", "1234").await);
        assert!(!auth.authenticate("test", "filepass").await);
    }

    #[tokio::test]
    async fn test_empty_chain_rejects_everyone() {
        let auth = ChainAuthenticator::from_config(&AuthConfig::default()).unwrap();
        assert!(auth.is_empty());
        assert!(!auth.authenticate("anyone", "").await);
    }
}
