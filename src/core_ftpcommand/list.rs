use crate::constants::{REPLY_DATA_CONNECTION_FAILED, REPLY_USE_PASV_FIRST};
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_listing::ListFormatter;
use crate::core_network::{DataChannelError, FtpConnection, PassiveDataChannel};
use crate::core_storage::Storage;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Handles the LIST FTP command.
///
/// The listing goes over the data connection opened by the preceding PASV.
/// Option-style arguments such as `-la` are ignored and the current
/// directory is listed.
pub struct ListHandler {
    storage: Arc<dyn Storage>,
    data_channel: Arc<PassiveDataChannel>,
    formatter: Arc<dyn ListFormatter>,
}

impl ListHandler {
    pub fn new(
        storage: Arc<dyn Storage>,
        data_channel: Arc<PassiveDataChannel>,
        formatter: Arc<dyn ListFormatter>,
    ) -> Self {
        Self {
            storage,
            data_channel,
            formatter,
        }
    }

    async fn send_listing(
        &self,
        listing: &str,
        session: &mut Session,
    ) -> Result<(), DataChannelError> {
        let mut data_stream = self.data_channel.accept_one(session).await?;
        data_stream
            .write_all(listing.as_bytes())
            .await
            .map_err(DataChannelError::Transfer)?;
        data_stream
            .shutdown()
            .await
            .map_err(DataChannelError::Transfer)
    }
}

#[async_trait]
impl CommandHandler for ListHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }

        let directory = match command.argument() {
            Some(arg) if !arg.starts_with('-') => session.resolve(arg),
            _ => session.current_dir.clone(),
        };

        if !session.has_data_listener() {
            return reply(REPLY_USE_PASV_FIRST);
        }

        let entries = match self.storage.list_all(&directory).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to list directory {}: {}", directory, e);
                self.data_channel.close(session);
                return reply(format!("550 Failed to list directory: {}", e));
            }
        };

        let listing: String = entries
            .iter()
            .map(|item| format!("{}\r\n", self.formatter.format(item)))
            .collect();

        if let Err(e) = conn.send_response("150 Here is the directory listing").await {
            self.data_channel.close(session);
            return Err(e.into());
        }

        let outcome = self.send_listing(&listing, session).await;
        self.data_channel.close(session);

        match outcome {
            Ok(()) => {
                info!("Listed {} ({} entries)", directory, entries.len());
                reply("226 Directory sending ok")
            }
            Err(e) if e.is_connect_failure() => {
                error!("LIST data connection failed: {}", e);
                reply(REPLY_DATA_CONNECTION_FAILED)
            }
            Err(e) => {
                error!("Failed to send listing of {}: {}", directory, e);
                reply(format!("550 Failed to list directory: {}", e))
            }
        }
    }
}
