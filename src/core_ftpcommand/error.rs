use crate::constants::{REPLY_INTERNAL_ERROR, REPLY_NOT_IMPLEMENTED};
use crate::core_tls::TlsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    /// The verb has no handler. Answered with 502; the connection carries on.
    #[error("Command '{0}' is not supported by this server")]
    NotSupported(String),

    /// The control connection failed. Fatal to the connection.
    #[error("Control connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TLS handshake failed mid-upgrade. Fatal to the connection.
    #[error(transparent)]
    Tls(#[from] TlsError),
}

impl CommandError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CommandError::NotSupported(_))
    }

    pub fn to_ftp_response(&self) -> String {
        match self {
            CommandError::NotSupported(_) => REPLY_NOT_IMPLEMENTED.to_string(),
            _ => REPLY_INTERNAL_ERROR.to_string(),
        }
    }
}
