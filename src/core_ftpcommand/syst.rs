use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::info;

/// Handles the SYST (System) FTP command.
///
/// Always reports a Unix-like system, which tells clients to expect
/// `ls -l` style listings.
pub struct SystHandler;

#[async_trait]
impl CommandHandler for SystHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        info!("Responding to SYST command with system type.");
        reply("215 UNIX Type: L8")
    }
}
