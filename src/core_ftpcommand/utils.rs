use crate::constants::{REPLY_NOT_LOGGED_IN, REPLY_SYNTAX_ERROR};
use crate::core_ftpcommand::error::CommandError;
use crate::session::Session;

/// What a handler hands back to the worker loop: the reply to send, or
/// `None` if the handler already wrote to the connection itself.
pub type CommandResult = Result<Option<String>, CommandError>;

pub fn reply(message: impl Into<String>) -> CommandResult {
    Ok(Some(message.into()))
}

/// The 530 reply, if `session` has not logged in yet.
pub fn require_login(session: &Session) -> Option<CommandResult> {
    if session.is_authenticated {
        None
    } else {
        Some(reply(REPLY_NOT_LOGGED_IN))
    }
}

pub fn syntax_error() -> CommandResult {
    reply(REPLY_SYNTAX_ERROR)
}
