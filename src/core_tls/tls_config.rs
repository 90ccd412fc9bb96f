use crate::core_tls::error::TlsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Enables AUTH TLS (and implicit TLS when `implicit_tls` is set)
    pub enabled: bool,

    /// PEM certificate chain
    pub cert_file: PathBuf,

    /// PEM private key (PKCS#8, PKCS#1 or SEC1)
    pub key_file: PathBuf,

    /// Negotiate TLS as soon as a connection is accepted, before the greeting
    pub implicit_tls: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cert_file: PathBuf::from("etc/ssl/cert.pem"),
            key_file: PathBuf::from("etc/ssl/key.pem"),
            implicit_tls: false,
        }
    }
}

impl TlsConfig {
    /// Checks that the certificate material exists when TLS is enabled.
    pub fn validate(&self) -> Result<(), TlsError> {
        if !self.enabled {
            if self.implicit_tls {
                return Err(TlsError::TlsConfigError(
                    "implicit_tls requires enabled = true".to_string(),
                ));
            }
            return Ok(());
        }

        if !self.cert_file.exists() {
            return Err(TlsError::CertificateLoadError(format!(
                "Certificate file not found: {:?}",
                self.cert_file
            )));
        }

        if !self.key_file.exists() {
            return Err(TlsError::PrivateKeyLoadError(format!(
                "Private key file not found: {:?}",
                self.key_file
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_tls_is_always_valid() {
        assert!(TlsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_implicit_without_enabled_is_rejected() {
        let config = TlsConfig {
            implicit_tls: true,
            ..TlsConfig::default()
        };
        assert!(matches!(config.validate(), Err(TlsError::TlsConfigError(_))));
    }

    #[test]
    fn test_missing_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        std::fs::write(&cert, "placeholder").unwrap();

        let config = TlsConfig {
            enabled: true,
            cert_file: cert,
            key_file: dir.path().join("missing.pem"),
            implicit_tls: false,
        };
        assert!(matches!(
            config.validate(),
            Err(TlsError::PrivateKeyLoadError(_))
        ));
    }
}
