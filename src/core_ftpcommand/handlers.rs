use crate::config::Config;
use crate::core_auth::Authenticator;
use crate::core_ftpcommand::error::CommandError;
use crate::core_ftpcommand::ftpcommand::{CommandLine, FtpCommand};
use crate::core_ftpcommand::utils::CommandResult;
use crate::core_ftpcommand::{
    auth::AuthHandler, cdup::CdupHandler, cwd::CwdHandler, dele::DeleHandler, feat::FeatHandler,
    list::ListHandler, pass::PassHandler, pbsz::PbszHandler, port::PortHandler, prot::ProtHandler,
    pwd::PwdHandler, quit::QuitHandler, retr::RetrHandler, stor::StorHandler, syst::SystHandler,
    type_::TypeHandler, user::UserHandler,
};
use crate::core_listing::ListFormatter;
use crate::core_network::{FtpConnection, PassiveDataChannel};
use crate::core_storage::Storage;
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// One protocol verb.
///
/// Expected protocol problems (bad syntax, not logged in, missing file) come
/// back as coded replies; only a broken control connection is an `Err`.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(
        &self,
        command: &CommandLine,
        conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult;
}

/// Dispatch table from verb to handler, built once at startup.
pub struct CommandRegistry {
    handlers: HashMap<FtpCommand, Arc<dyn CommandHandler>>,
    data_channel: Arc<PassiveDataChannel>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut verbs: Vec<&str> = self.handlers.keys().map(FtpCommand::as_str).collect();
        verbs.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("verbs", &verbs)
            .field("data_channel", &self.data_channel)
            .finish()
    }
}

impl CommandRegistry {
    pub fn new(
        storage: Arc<dyn Storage>,
        authenticator: Arc<dyn Authenticator>,
        formatter: Arc<dyn ListFormatter>,
        config: &Config,
    ) -> Self {
        // PASV, LIST, RETR and STOR must all see the same data channel
        let data_channel = Arc::new(PassiveDataChannel::from_config(&config.server));
        let upload_buffer_size = config.upload_buffer_size();

        let mut handlers: HashMap<FtpCommand, Arc<dyn CommandHandler>> = HashMap::new();

        handlers.insert(FtpCommand::USER, Arc::new(UserHandler));
        handlers.insert(FtpCommand::PASS, Arc::new(PassHandler::new(authenticator)));
        handlers.insert(FtpCommand::QUIT, Arc::new(QuitHandler));
        handlers.insert(FtpCommand::AUTH, Arc::new(AuthHandler::new(config.tls.enabled)));
        handlers.insert(FtpCommand::PBSZ, Arc::new(PbszHandler));
        handlers.insert(FtpCommand::PROT, Arc::new(ProtHandler));
        handlers.insert(FtpCommand::FEAT, Arc::new(FeatHandler));
        handlers.insert(FtpCommand::SYST, Arc::new(SystHandler));
        handlers.insert(FtpCommand::CWD, Arc::new(CwdHandler));
        handlers.insert(FtpCommand::CDUP, Arc::new(CdupHandler));
        handlers.insert(FtpCommand::PWD, Arc::new(PwdHandler));
        handlers.insert(FtpCommand::TYPE, Arc::new(TypeHandler));
        handlers.insert(FtpCommand::PORT, Arc::new(PortHandler));
        handlers.insert(FtpCommand::PASV, data_channel.clone());
        handlers.insert(
            FtpCommand::LIST,
            Arc::new(ListHandler::new(
                storage.clone(),
                data_channel.clone(),
                formatter,
            )),
        );
        handlers.insert(
            FtpCommand::RETR,
            Arc::new(RetrHandler::new(storage.clone(), data_channel.clone())),
        );
        handlers.insert(
            FtpCommand::STOR,
            Arc::new(StorHandler::new(
                storage.clone(),
                data_channel.clone(),
                upload_buffer_size,
            )),
        );
        handlers.insert(FtpCommand::DELE, Arc::new(DeleHandler::new(storage)));

        Self {
            handlers,
            data_channel,
        }
    }

    /// Looks up the handler for `verb`, case-insensitively.
    pub fn handler(&self, verb: &str) -> Result<Arc<dyn CommandHandler>, CommandError> {
        verb.parse::<FtpCommand>()
            .ok()
            .and_then(|command| self.handlers.get(&command).cloned())
            .ok_or_else(|| CommandError::NotSupported(verb.to_ascii_uppercase()))
    }

    pub async fn dispatch(
        &self,
        command: &CommandLine,
        conn: &mut FtpConnection,
        session: &mut Session,
    ) -> CommandResult {
        let handler = self.handler(command.verb())?;
        handler.handle(command, conn, session).await
    }

    pub fn data_channel(&self) -> &Arc<PassiveDataChannel> {
        &self.data_channel
    }
}
