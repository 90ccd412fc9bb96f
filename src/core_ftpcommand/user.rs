use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// Starts a new login: the username is recorded and any previous
/// authentication is dropped until PASS succeeds again.
pub struct UserHandler;

#[async_trait]
impl CommandHandler for UserHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        let Some(username) = command.argument() else {
            warn!("USER command received with no arguments");
            return syntax_error();
        };

        session.begin_login(username);
        info!("Username accepted: {}", username);
        reply("331 Password required")
    }
}
