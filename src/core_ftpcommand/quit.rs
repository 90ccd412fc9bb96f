use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::CommandResult;
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::{debug, info};

/// Handles the QUIT FTP command: says goodbye and closes the control
/// connection, which ends the worker loop.
pub struct QuitHandler;

#[async_trait]
impl CommandHandler for QuitHandler {
    async fn handle(
        &self,
        _command: &CommandLine,
        conn: &mut FtpConnection,
        _session: &mut Session,
    ) -> CommandResult {
        info!("Received QUIT command from {}. Closing connection.", conn.peer_addr());
        conn.send_response("221 Goodbye").await?;

        if let Err(e) = conn.close().await {
            // The client often hangs up first
            debug!("Error closing control connection after QUIT: {}", e);
        }
        Ok(None)
    }
}
