use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

pub const FEATURES_REPLY: &str = "211-Features:\r\n AUTH TLS\r\n PBSZ\r\n PROT\r\n UTF8\r\n211 End";

pub struct FeatHandler;

#[async_trait]
impl CommandHandler for FeatHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        _session: &mut Session,
    ) -> CommandResult {
        reply(FEATURES_REPLY)
    }
}
