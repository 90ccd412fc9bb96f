use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

pub struct PwdHandler;

#[async_trait]
impl CommandHandler for PwdHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        // A quote inside the path is written twice
        reply(format!(
            "257 \"{}\" is the current directory",
            session.current_dir.replace('"', "\"\"")
        ))
    }
}
