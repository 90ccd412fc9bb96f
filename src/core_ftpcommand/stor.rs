use crate::constants::{REPLY_DATA_CONNECTION_FAILED, REPLY_USE_PASV_FIRST};
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, syntax_error, CommandResult};
use crate::core_network::{DataChannelError, FtpConnection, PassiveDataChannel};
use crate::core_storage::Storage;
use crate::session::Session;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Handles the STOR (Store File) FTP command.
///
/// The upload ends when the client closes the data connection. Nothing is
/// written to storage unless the whole payload arrived.
pub struct StorHandler {
    storage: Arc<dyn Storage>,
    data_channel: Arc<PassiveDataChannel>,
    buffer_size: usize,
}

impl StorHandler {
    pub fn new(
        storage: Arc<dyn Storage>,
        data_channel: Arc<PassiveDataChannel>,
        buffer_size: usize,
    ) -> Self {
        Self {
            storage,
            data_channel,
            buffer_size: buffer_size.max(1),
        }
    }

    async fn receive_file(&self, session: &mut Session) -> Result<Vec<u8>, DataChannelError> {
        let mut data_stream = self.data_channel.accept_one(session).await?;
        let mut payload = Vec::new();
        let mut buffer = vec![0; self.buffer_size];

        loop {
            let bytes_read = data_stream
                .read(&mut buffer)
                .await
                .map_err(DataChannelError::Transfer)?;
            if bytes_read == 0 {
                break;
            }
            payload.extend_from_slice(&buffer[..bytes_read]);
        }

        debug!("Received {} bytes on data connection", payload.len());
        Ok(payload)
    }
}

#[async_trait]
impl CommandHandler for StorHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        let Some(name) = command.argument() else {
            warn!("STOR command received with no arguments");
            return syntax_error();
        };

        if !session.has_data_listener() {
            return reply(REPLY_USE_PASV_FIRST);
        }

        let file_path = session.resolve(name);
        if let Err(e) = conn.send_response("150 Ready to receive data.").await {
            self.data_channel.close(session);
            return Err(e.into());
        }

        let received = self.receive_file(session).await;
        self.data_channel.close(session);

        let payload = match received {
            Ok(payload) => payload,
            Err(e) if e.is_connect_failure() => {
                error!("STOR data connection failed: {}", e);
                return reply(REPLY_DATA_CONNECTION_FAILED);
            }
            Err(e) => {
                error!("Failed to receive {}: {}", file_path, e);
                return reply(format!("550 Failed to store file: {}", e));
            }
        };

        match self.storage.store(&file_path, &payload).await {
            Ok(()) => {
                info!("Stored {} ({} bytes)", file_path, payload.len());
                reply("226 File stored successfully.")
            }
            Err(e) => {
                error!("Failed to store {}: {}", file_path, e);
                reply(format!("550 Failed to store file: {}", e))
            }
        }
    }
}
