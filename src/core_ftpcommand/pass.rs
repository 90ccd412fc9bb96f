use crate::core_auth::Authenticator;
use crate::core_ftpcommand::ftpcommand::CommandLine;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::utils::{reply, syntax_error, CommandResult};
use crate::core_network::FtpConnection;
use crate::session::{LoginState, Session};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

/// Handles the PASS FTP command by asking the credential collaborator.
pub struct PassHandler {
    authenticator: Arc<dyn Authenticator>,
}

impl PassHandler {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl CommandHandler for PassHandler {
    async fn handle(
        &self,
        command: &CommandLine,
        _conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        let username = match session.login_state() {
            LoginState::Authenticated => return reply("503 Already logged in."),
            LoginState::Unauthenticated => return reply("503 Login with USER first."),
            LoginState::AwaitingPassword => session.username.clone().unwrap_or_default(),
        };

        let Some(password) = command.argument() else {
            return syntax_error();
        };

        if self.authenticator.authenticate(&username, password).await {
            session.is_authenticated = true;
            info!("User {} logged in", username);
            reply("230 User logged in.")
        } else {
            warn!("Authentication failed for user {}", username);
            reply("530 Authentication failed.")
        }
    }
}
