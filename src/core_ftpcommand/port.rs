use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

/// Active mode is not offered; clients must use PASV.
pub struct PortHandler;

#[async_trait]
impl CommandHandler for PortHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        reply("502 Active mode not implemented.")
    }
}
