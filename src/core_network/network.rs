use crate::config::Config;
use crate::constants::{REPLY_CLOSING, REPLY_INVALID_COMMAND, REPLY_NOT_IMPLEMENTED, REPLY_NOT_LOGGED_IN};
use crate::core_ftpcommand::error::CommandError;
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandRegistry;
use crate::core_network::connection::FtpConnection;
use crate::core_tls::{TlsContext, TlsError};
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Control-channel listening socket.
#[derive(Debug)]
pub struct ConnectionListener {
    listener: TcpListener,
    tls: Option<TlsContext>,
    implicit_tls: bool,
}

impl ConnectionListener {
    pub async fn bind(config: &Config, tls: Option<TlsContext>) -> Result<Self> {
        let addr = SocketAddr::new(config.server.listen_address, config.server.listen_port);
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind control listener on {}", addr))?;

        let implicit_tls = config.tls.implicit_tls && tls.is_some();
        info!(
            "Server listening on {}{}",
            listener.local_addr()?,
            if implicit_tls { " (implicit TLS)" } else { "" }
        );

        Ok(Self {
            listener,
            tls,
            implicit_tls,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts a raw socket. The TLS handshake (if any) is left to
    /// `PendingConnection::establish` so a slow client cannot stall the accept loop.
    pub async fn accept(&self) -> io::Result<PendingConnection> {
        let (stream, peer_addr) = self.listener.accept().await?;
        Ok(PendingConnection {
            stream,
            peer_addr,
            tls: self.tls.clone(),
            implicit_tls: self.implicit_tls,
        })
    }
}

/// An accepted socket that has not been turned into an `FtpConnection` yet.
#[derive(Debug)]
pub struct PendingConnection {
    stream: TcpStream,
    peer_addr: SocketAddr,
    tls: Option<TlsContext>,
    implicit_tls: bool,
}

impl PendingConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub async fn establish(self) -> Result<FtpConnection, TlsError> {
        match (&self.tls, self.implicit_tls) {
            (Some(tls), true) => {
                let tls_stream = tls.accept(self.stream).await?;
                debug!("Implicit TLS established with {}", self.peer_addr);
                Ok(FtpConnection::new(tls_stream, self.peer_addr, self.tls, true))
            }
            _ => Ok(FtpConnection::new(self.stream, self.peer_addr, self.tls, false)),
        }
    }
}

/// Runs one control connection to completion: greeting, then one command
/// and one reply at a time until QUIT, hang-up, shutdown or a fatal error.
///
/// Shutdown is only looked at between commands. A client blocked in a read
/// is not interrupted; it gets one more command served, then the 421.
pub async fn handle_connection(
    mut conn: FtpConnection,
    registry: Arc<CommandRegistry>,
    config: Arc<Config>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), CommandError> {
    let peer = conn.peer_addr();
    let mut session = Session::new();

    let outcome = serve(&mut conn, &mut session, &registry, &config, &shutdown).await;
    registry.data_channel().close(&mut session);

    if let Err(e) = &outcome {
        error!("Error handling the client's command from {}: {}", peer, e);
        // Best effort: the control socket may be what failed
        if let Err(send_err) = conn.send_response(&e.to_ftp_response()).await {
            debug!("Could not report error to {}: {}", peer, send_err);
        }
    }

    if let Err(e) = conn.close().await {
        debug!("Error while closing connection to {}: {}", peer, e);
    }
    outcome
}

async fn serve(
    conn: &mut FtpConnection,
    session: &mut Session,
    registry: &CommandRegistry,
    config: &Config,
    shutdown: &watch::Receiver<bool>,
) -> Result<(), CommandError> {
    debug!(
        "Session started for {} (encrypted: {})",
        conn.peer_addr(),
        conn.is_encrypted()
    );
    conn.send_response(&format!("220 {}", config.server.greeting))
        .await?;

    loop {
        if *shutdown.borrow() {
            return close_for_shutdown(conn).await;
        }

        let line = match conn.read_command().await? {
            Some(line) => line,
            None => {
                info!("Client {} disconnected", conn.peer_addr());
                return Ok(());
            }
        };

        let Some(command) = CommandLine::parse(&line) else {
            conn.send_response(REPLY_INVALID_COMMAND).await?;
            continue;
        };
        debug!("Received command from {}: {}", conn.peer_addr(), command);

        if !session.is_command_allowed(command.verb()) {
            conn.send_response(REPLY_NOT_LOGGED_IN).await?;
            continue;
        }

        match registry.dispatch(&command, conn, session).await {
            Ok(Some(response)) => conn.send_response(&response).await?,
            Ok(None) => {}
            Err(e) if !e.is_fatal() => {
                warn!("{} (from {})", e, conn.peer_addr());
                conn.send_response(REPLY_NOT_IMPLEMENTED).await?;
            }
            Err(e) => return Err(e),
        }

        if conn.is_closed() {
            return Ok(());
        }
    }
}

async fn close_for_shutdown(conn: &mut FtpConnection) -> Result<(), CommandError> {
    info!("Server stopping, closing connection to {}", conn.peer_addr());
    conn.send_response(REPLY_CLOSING).await?;
    Ok(())
}
