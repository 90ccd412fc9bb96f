use crate::constants::REPLY_NOT_IMPLEMENTED;
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::Session;
use async_trait::async_trait;
use log::{error, info};

/// Handles AUTH TLS: upgrades the control connection in place.
pub struct AuthHandler {
    tls_enabled: bool,
}

impl AuthHandler {
    pub fn new(tls_enabled: bool) -> Self {
        Self { tls_enabled }
    }
}

#[async_trait]
impl CommandHandler for AuthHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        conn: &mut FtpConnection,
        _session: &mut Session,
    ) -> CommandResult {
        if !self.tls_enabled {
            return reply(REPLY_NOT_IMPLEMENTED);
        }

        let Some(mechanism) = command.argument() else {
            return syntax_error();
        };
        if !matches!(
            mechanism.to_ascii_uppercase().as_str(),
            "TLS" | "TLS-C" | "SSL"
        ) {
            return reply("504 Command not implemented for that parameter.");
        }

        // Misconfiguration is reported before 234, while the line protocol is still intact
        if let Err(e) = conn.check_tls_upgrade() {
            error!("AUTH {} refused for {}: {}", mechanism, conn.peer_addr(), e);
            return reply(e.to_ftp_response());
        }

        conn.send_response("234 Proceed with negotiation.").await?;
        conn.upgrade_to_tls().await?;
        info!("Control connection from {} is now encrypted", conn.peer_addr());

        // Nothing more to say until the client's next command, which arrives encrypted
        Ok(None)
    }
}
