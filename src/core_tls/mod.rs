// TLS support for the control channel: explicit (AUTH TLS) and implicit.

pub mod error;
pub mod tls_acceptor;
pub mod tls_config;

pub use error::TlsError;
pub use tls_acceptor::TlsContext;
pub use tls_config::TlsConfig;
