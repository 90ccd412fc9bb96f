use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// Handles the CWD FTP command.
///
/// The new directory is a purely logical join with the current one; storage
/// is not consulted, so a missing directory simply lists as empty.
pub struct CwdHandler;

#[async_trait]
impl CommandHandler for CwdHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        let Some(path) = command.argument() else {
            return syntax_error();
        };

        session.change_dir(path);
        info!("Directory successfully changed to: {}", session.current_dir);
        reply("250 Directory changed successfully.")
    }
}
