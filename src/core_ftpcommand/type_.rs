use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, require_login, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;

/// Handles the TYPE FTP command.
///
/// ASCII (A) and Image (I) are accepted. Both transfer bytes unchanged, so
/// the chosen type is not kept on the session.
pub struct TypeHandler;

#[async_trait]
impl CommandHandler for TypeHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        if let Some(denied) = require_login(session) {
            return denied;
        }
        let Some(arg) = command.argument() else {
            return syntax_error();
        };

        let primary_type = arg.to_ascii_uppercase();
        match primary_type.as_str() {
            "A" | "I" => reply(format!("200 Type set to {}.", primary_type)),
            _ => reply("504 Command not implemented for that parameter."),
        }
    }
}
