use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

/// Accepts PROT C (clear) and PROT P (private). The level is acknowledged
/// for client compatibility; data connections stay plain TCP.
pub struct ProtHandler;

#[async_trait]
impl CommandHandler for ProtHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }

        match command.argument().map(str::to_ascii_uppercase).as_deref() {
            Some("C") | Some("P") => reply("200 PROT command successful."),
            _ => reply("504 Command not implemented for that parameter."),
        }
    }
}
