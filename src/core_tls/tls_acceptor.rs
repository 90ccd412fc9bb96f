use crate::core_tls::error::TlsError;
use crate::core_tls::tls_config::TlsConfig;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::server::TlsStream;
use tokio_rustls::{rustls, TlsAcceptor};

/// Server-side TLS material, loaded once and shared by every connection.
#[derive(Clone)]
pub struct TlsContext {
    acceptor: TlsAcceptor,
}

impl std::fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsContext").finish_non_exhaustive()
    }
}

impl TlsContext {
    /// Builds the context from configuration, or `None` when TLS is disabled.
    pub fn from_config(config: &TlsConfig) -> Result<Option<Self>, TlsError> {
        if !config.enabled {
            return Ok(None);
        }
        config.validate()?;
        Self::from_pem_files(&config.cert_file, &config.key_file).map(Some)
    }

    pub fn from_pem_files(cert_file: &Path, key_file: &Path) -> Result<Self, TlsError> {
        let cert_pem = std::fs::read(cert_file)
            .map_err(|e| TlsError::CertificateLoadError(format!("{:?}: {}", cert_file, e)))?;
        let key_pem = std::fs::read(key_file)
            .map_err(|e| TlsError::PrivateKeyLoadError(format!("{:?}: {}", key_file, e)))?;
        Self::from_pem(&cert_pem, &key_pem)
    }

    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, TlsError> {
        let cert_chain = rustls_pemfile::certs(&mut &cert_pem[..])
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;
        if cert_chain.is_empty() {
            return Err(TlsError::CertificateLoadError(
                "No certificate found".to_string(),
            ));
        }

        let private_key = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?
            .ok_or_else(|| TlsError::PrivateKeyLoadError("No private key found".to_string()))?;

        let config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(cert_chain, private_key)
            .map_err(|e| TlsError::TlsConfigError(e.to_string()))?;

        debug!("TLS acceptor ready");
        Ok(Self {
            acceptor: TlsAcceptor::from(Arc::new(config)),
        })
    }

    /// Runs the server side of the handshake over an existing stream.
    pub async fn accept<IO>(&self, stream: IO) -> Result<TlsStream<IO>, TlsError>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        self.acceptor
            .accept(stream)
            .await
            .map_err(|e| TlsError::TlsHandshakeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_yields_no_context() {
        let context = TlsContext::from_config(&TlsConfig::default()).unwrap();
        assert!(context.is_none());
    }

    #[test]
    fn test_loads_self_signed_certificate() {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_pem = certified.cert.pem();
        let key_pem = certified.key_pair.serialize_pem();

        assert!(TlsContext::from_pem(cert_pem.as_bytes(), key_pem.as_bytes()).is_ok());
    }

    #[test]
    fn test_rejects_garbage_certificate() {
        let result = TlsContext::from_pem(b"not a certificate", b"not a key");
        assert!(matches!(result, Err(TlsError::CertificateLoadError(_))));
    }
}
