use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

/// PBSZ is only meaningful for TLS clients; any buffer size is acknowledged.
pub struct PbszHandler;

#[async_trait]
impl CommandHandler for PbszHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        reply("200 PBSZ command successful.")
    }
}
