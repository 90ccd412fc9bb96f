use crate::config::ServerConfig;
use crate::session::Session;
use log::{debug, trace};
use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("Passive mode not initialized")]
    NotOpen,

    #[error("No data connection within {0:?}")]
    Timeout(Duration),

    #[error("Failed to accept data connection: {0}")]
    Io(#[from] io::Error),

    #[error("Data transfer failed: {0}")]
    Transfer(io::Error),
}

impl DataChannelError {
    /// True when no data connection was ever established.
    pub fn is_connect_failure(&self) -> bool {
        !matches!(self, DataChannelError::Transfer(_))
    }
}

/// Owns the lifecycle of passive-mode data listeners.
///
/// One instance is shared by PASV, LIST, RETR and STOR; the listener itself
/// lives in the `Session`, so sessions never see each other's ports.
#[derive(Debug, Clone)]
pub struct PassiveDataChannel {
    advertise_ip: Ipv4Addr,
    accept_timeout: Duration,
}

impl PassiveDataChannel {
    pub fn new(advertise_ip: Ipv4Addr, accept_timeout: Duration) -> Self {
        Self {
            advertise_ip,
            accept_timeout,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.pasv_ip(), config.data_timeout())
    }

    pub fn advertise_ip(&self) -> Ipv4Addr {
        self.advertise_ip
    }

    /// Binds a fresh ephemeral listener for `session`, tearing down any earlier
    /// one, and returns the 227 reply announcing it. On failure the session is
    /// left without a listener.
    pub async fn open(&self, session: &mut Session) -> io::Result<String> {
        // Bind before releasing the old port so the two can never coincide
        let bound = TcpListener::bind((self.advertise_ip, 0)).await;
        self.close(session);

        let listener = bound?;
        let port = listener.local_addr()?.port();
        session.data_listener = Some(listener);

        debug!(
            "PASV listener set up on IP: {}, Port: {}",
            self.advertise_ip, port
        );
        Ok(format_pasv_reply(self.advertise_ip, port))
    }

    /// Waits for the single data connection of the pending transfer.
    ///
    /// The listener is taken out of the session first, so it can never hand
    /// out a second connection; it is closed as soon as this returns.
    pub async fn accept_one(&self, session: &mut Session) -> Result<TcpStream, DataChannelError> {
        let listener = session
            .data_listener
            .take()
            .ok_or(DataChannelError::NotOpen)?;

        let (data_stream, addr) = timeout(self.accept_timeout, listener.accept())
            .await
            .map_err(|_| DataChannelError::Timeout(self.accept_timeout))??;

        debug!("Accepted data connection from: {}", addr);
        Ok(data_stream)
    }

    /// Stops the session's listener, if any.
    pub fn close(&self, session: &mut Session) {
        if let Some(listener) = session.data_listener.take() {
            if let Ok(addr) = listener.local_addr() {
                trace!("Closing PASV listener on {}", addr);
            }
        }
    }
}

/// `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2).` with port = p1*256 + p2.
pub fn format_pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).",
        h1,
        h2,
        h3,
        h4,
        port / 256,
        port % 256
    )
}
