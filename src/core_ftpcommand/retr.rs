use crate::constants::{REPLY_DATA_CONNECTION_FAILED, REPLY_USE_PASV_FIRST};
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, syntax_error, CommandResult};
use crate::core_network::{DataChannelError, FtpConnection, PassiveDataChannel};
use crate::core_storage::Storage;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Handles the RETR (Retrieve) FTP command.
///
/// The file is fetched from storage before the preliminary 150, so a missing
/// file is reported without ever accepting a data connection.
pub struct RetrHandler {
    storage: Arc<dyn Storage>,
    data_channel: Arc<PassiveDataChannel>,
}

impl RetrHandler {
    pub fn new(storage: Arc<dyn Storage>, data_channel: Arc<PassiveDataChannel>) -> Self {
        Self {
            storage,
            data_channel,
        }
    }

    async fn send_file(&self, data: &[u8], session: &mut Session) -> Result<(), DataChannelError> {
        let mut data_stream = self.data_channel.accept_one(session).await?;
        data_stream
            .write_all(data)
            .await
            .map_err(DataChannelError::Transfer)?;
        data_stream
            .shutdown()
            .await
            .map_err(DataChannelError::Transfer)
    }
}

#[async_trait]
impl CommandHandler for RetrHandler {
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
            warn!("RETR command received with no arguments");
            return syntax_error();
        };

        if !session.has_data_listener() {
            return reply(REPLY_USE_PASV_FIRST);
        }

        let file_path = session.resolve(name);
        let data = match self.storage.retrieve(&file_path).await {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to retrieve {}: {}", file_path, e);
                self.data_channel.close(session);
                return reply("550 File unavailable or retrieval failed.");
            }
        };

        if let Err(e) = conn
            .send_response("150 Opening data connection for file transfer.")
            .await
        {
            self.data_channel.close(session);
            return Err(e.into());
        }

        let outcome = self.send_file(&data, session).await;
        self.data_channel.close(session);

        match outcome {
            Ok(()) => {
                info!("File transfer completed successfully: {} ({} bytes)", file_path, data.len());
                reply("226 Transfer complete.")
            }
            Err(e) if e.is_connect_failure() => {
                error!("RETR data connection failed: {}", e);
                reply(REPLY_DATA_CONNECTION_FAILED)
            }
            Err(e) => {
                error!("Error sending file to client: {}", e);
                reply("550 File unavailable or retrieval failed.")
            }
        }
    }
}
