use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::{FtpConnection, PassiveDataChannel};
use crate::session::Session;
use async_trait::async_trait;
use log::error;

/// PASV is served by the data channel manager itself, so the instance in the
/// registry is the very one LIST, RETR and STOR accept from.
#[async_trait]
impl CommandHandler for PassiveDataChannel {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }

        match self.open(session).await {
            Ok(pasv_reply) => reply(pasv_reply),
            Err(e) => {
                error!("Failed to set up PASV listener on {}: {}", self.advertise_ip(), e);
                reply(format!("500 Failed to enter passive mode: {}", e))
            }
        }
    }
}
