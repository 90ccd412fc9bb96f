mod common;

use common::{start_server, test_config, Client};
use rouillepasv::Config;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName};
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

/// Self-signed `localhost` certificate written into a scratch directory.
fn tls_config(dir: &TempDir) -> (Config, CertificateDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_file = dir.path().join("cert.pem");
    let key_file = dir.path().join("key.pem");
    std::fs::write(&cert_file, certified.cert.pem()).unwrap();
    std::fs::write(&key_file, certified.key_pair.serialize_pem()).unwrap();

    let mut config = test_config();
    config.tls.enabled = true;
    config.tls.cert_file = cert_file;
    config.tls.key_file = key_file;
    (config, certified.cert.der().clone())
}

fn connector(cert: CertificateDer<'static>) -> TlsConnector {
    let mut roots = RootCertStore::empty();
    roots.add(cert).unwrap();
    let client_config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(client_config))
}

#[tokio::test]
async fn test_explicit_tls_upgrade() {
    let dir = TempDir::new().unwrap();
    let (config, cert) = tls_config(&dir);
    let (server, addr) = start_server(config).await;

    let mut client = Client::connect(addr).await;
    assert!(client.read_reply().await.starts_with("220 "));

    // FEAT needs a login first
    assert_eq!(
        client.command("FEAT").await,
        "530 Please login with USER and PASS."
    );

    assert_eq!(
        client.command("AUTH SSH").await,
        "504 Command not implemented for that parameter."
    );
    assert_eq!(client.command("AUTH TLS").await, "234 Proceed with negotiation.");

    let tcp = client.into_inner();
    let server_name = ServerName::try_from("localhost").unwrap();
    let tls = connector(cert).connect(server_name, tcp).await.unwrap();
    let mut client = Client::new(tls);

    client.login().await;
    assert_eq!(client.command("PBSZ 0").await, "200 PBSZ command successful.");
    assert_eq!(client.command("PROT P").await, "200 PROT command successful.");
    assert_eq!(
        client.command("PWD").await,
        "257 \"/\" is the current directory"
    );
    assert!(client
        .command("AUTH TLS")
        .await
        .starts_with("500 Internal server error."));
    assert_eq!(client.command("QUIT").await, "221 Goodbye");

    server.stop().await;
}

#[tokio::test]
async fn test_implicit_tls() {
    let dir = TempDir::new().unwrap();
    let (mut config, cert) = tls_config(&dir);
    config.tls.implicit_tls = true;
    let (server, addr) = start_server(config).await;

    let tcp = tokio::net::TcpStream::connect(addr).await.unwrap();
    let server_name = ServerName::try_from("localhost").unwrap();
    let tls = connector(cert).connect(server_name, tcp).await.unwrap();
    let mut client = Client::new(tls);

    assert!(client.read_reply().await.starts_with("220 "));
    client.login().await;
    assert!(client
        .command("AUTH TLS")
        .await
        .starts_with("500 Internal server error."));

    server.stop().await;
}
