use crate::config::Config;
use crate::core_auth::{Authenticator, ChainAuthenticator};
use crate::core_ftpcommand::CommandRegistry;
use crate::core_listing::{ListFormatter, UnixListFormatter};
use crate::core_network::{handle_connection, ConnectionListener};
use crate::core_storage::{create_storage, Storage};
use crate::core_tls::{TlsContext, TlsError};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Pause after a failed accept so a persistent error does not spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Outcome of a `start` or `stop` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Started,
    AlreadyRunning,
    Stopped,
    NotRunning,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ServerStatus::Started => "Server started.",
            ServerStatus::AlreadyRunning => "Server is already running.",
            ServerStatus::Stopped => "Server stopped.",
            ServerStatus::NotRunning => "Server is not running.",
        };
        f.write_str(text)
    }
}

#[derive(Debug)]
struct RunningServer {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

/// The FTP server: owns the control listener and the accept loop.
///
/// Every accepted connection runs in its own task with its own `Session`.
/// The command registry, configuration and storage are shared read-only.
#[derive(Debug)]
pub struct Server {
    config: Arc<Config>,
    registry: Arc<CommandRegistry>,
    tls: Option<TlsContext>,
    state: Mutex<Option<RunningServer>>,
}

impl Server {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        authenticator: Arc<dyn Authenticator>,
        formatter: Arc<dyn ListFormatter>,
    ) -> Result<Self, TlsError> {
        let tls = TlsContext::from_config(&config.tls)?;
        let registry = CommandRegistry::new(storage, authenticator, formatter, &config);

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            tls,
            state: Mutex::new(None),
        })
    }

    /// Builds the server with the collaborators selected in `config`.
    pub async fn from_config(config: Config) -> Result<Self> {
        let storage = create_storage(&config.storage)
            .await
            .context("Failed to initialize storage backend")?;
        let authenticator =
            ChainAuthenticator::from_config(&config.auth).context("Failed to load users")?;
        if authenticator.is_empty() {
            warn!("No users configured; every login will be refused");
        }

        let server = Self::new(
            config,
            storage,
            Arc::new(authenticator),
            Arc::new(UnixListFormatter::default()),
        )
        .context("Failed to set up TLS")?;
        Ok(server)
    }

    /// Binds the control listener and spawns the accept loop. Returns as soon
    /// as the listener is bound.
    pub async fn start(&self) -> Result<ServerStatus> {
        let mut state = self.state.lock().await;
        if state.is_some() {
            info!("{}", ServerStatus::AlreadyRunning);
            return Ok(ServerStatus::AlreadyRunning);
        }

        let listener = ConnectionListener::bind(&self.config, self.tls.clone()).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = watch::channel(false);

        let accept_task = tokio::spawn(accept_loop(
            listener,
            self.registry.clone(),
            self.config.clone(),
            shutdown_rx,
        ));

        *state = Some(RunningServer {
            local_addr,
            shutdown,
            accept_task,
        });
        info!("{}", ServerStatus::Started);
        Ok(ServerStatus::Started)
    }

    /// Closes the control listener and ends the accept loop. Connected
    /// clients are not cut off: a worker notices the stop only after it has
    /// finished a command, and then answers 421 instead of reading another.
    pub async fn stop(&self) -> ServerStatus {
        let Some(running) = self.state.lock().await.take() else {
            info!("{}", ServerStatus::NotRunning);
            return ServerStatus::NotRunning;
        };

        // Only fails once every receiver is gone, which is fine here
        let _ = running.shutdown.send(true);
        if let Err(e) = running.accept_task.await {
            error!("Accept loop ended abnormally: {}", e);
        }

        info!("{}", ServerStatus::Stopped);
        ServerStatus::Stopped
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Address the control listener is bound to, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.state.lock().await.as_ref().map(|running| running.local_addr)
    }
}

async fn accept_loop(
    listener: ConnectionListener,
    registry: Arc<CommandRegistry>,
    config: Arc<Config>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let pending = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            accepted = listener.accept() => accepted,
        };

        let pending = match pending {
            Ok(pending) => pending,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };

        let peer = pending.peer_addr();
        info!("Accepted connection from {}", peer);

        let registry = registry.clone();
        let config = config.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let conn = match pending.establish().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("TLS handshake with {} failed: {}", peer, e);
                    return;
                }
            };

            match handle_connection(conn, registry, config, shutdown).await {
                Ok(()) => info!("Connection with {} closed", peer),
                Err(e) => debug!("Connection with {} ended with error: {}", peer, e),
            }
        });
    }

    // Dropping the listener here closes the control port
    info!("Stopped accepting connections");
}
