use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

pub struct CdupHandler;

#[async_trait]
impl CommandHandler for CdupHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }

        if session.change_dir_up() {
            info!("Directory successfully changed to: {}", session.current_dir);
            reply("250 Directory changed successfully.")
        } else {
            warn!("CDUP refused: already at root directory");
            reply("550 Already at root directory.")
        }
    }
}
