use crate::core_tls::TlsConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_DATA_TIMEOUT_SECS, DEFAULT_GREETING, DEFAULT_UPLOAD_BUFFER_SIZE};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: IpAddr,
    pub listen_port: u16,
    pub pasv_address: Option<Ipv4Addr>, // Public IPv4 advertised in PASV replies
    pub greeting: String,
    pub data_timeout: u64, // Seconds to wait for the passive data connection
    pub upload_buffer_size: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: 21,
            pasv_address: None,
            greeting: String::from(DEFAULT_GREETING),
            data_timeout: DEFAULT_DATA_TIMEOUT_SECS,
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE),
        }
    }
}

impl ServerConfig {
    /// Address the PASV listener binds to and advertises.
    ///
    /// Falls back to loopback when nothing (or the wildcard address) is configured,
    /// since `0.0.0.0` is not something a client can connect back to.
    pub fn pasv_ip(&self) -> Ipv4Addr {
        match self.pasv_address {
            Some(ip) if !ip.is_unspecified() => ip,
            _ => Ipv4Addr::LOCALHOST,
        }
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            root: PathBuf::from("/var/ftp"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub passwd_file: Option<PathBuf>,
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub tls: TlsConfig,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Set defaults if not specified
        if config.server.upload_buffer_size.is_none() {
            config.server.upload_buffer_size = Some(DEFAULT_UPLOAD_BUFFER_SIZE);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tls.validate().context("Invalid [tls] section")?;
        if self.server.upload_buffer_size == Some(0) {
            anyhow::bail!("server.upload_buffer_size must be greater than zero");
        }
        Ok(())
    }

    pub fn upload_buffer_size(&self) -> usize {
        self.server
            .upload_buffer_size
            .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE)
    }
}
