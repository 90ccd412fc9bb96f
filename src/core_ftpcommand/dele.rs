use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::core_storage::Storage;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;

/// Handles the DELE (Delete File) FTP command.
pub struct DeleHandler {
    storage: Arc<dyn Storage>,
}

impl DeleHandler {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CommandHandler for DeleHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        let Some(name) = command.argument() else {
            return syntax_error();
        };

        let file_path = session.resolve(name);
        match self.storage.delete(&file_path).await {
            Ok(true) => {
                info!("Deleted {}", file_path);
                reply("250 File deleted successfully.")
            }
            Ok(false) => {
                warn!("DELE of missing file {}", file_path);
                reply("550 File not found or deletion has failed.")
            }
            Err(e) => {
                error!("Failed to delete {}: {}", file_path, e);
                reply("550 File not found or deletion has failed.")
            }
        }
    }
}
