// src/constants.rs

pub const DEFAULT_GREETING: &str = "Welcome to rouillepasv FTP server.";
pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 64 * 1024;
/// Longest control line accepted, terminator included.
pub const MAX_COMMAND_LINE_LENGTH: usize = 4096;

/// Verbs accepted before PASS has succeeded.
pub const UNAUTHENTICATED_COMMANDS: [&str; 4] = ["USER", "PASS", "QUIT", "AUTH"];

pub const REPLY_NOT_LOGGED_IN: &str = "530 Please login with USER and PASS.";
pub const REPLY_SYNTAX_ERROR: &str = "501 Syntax error in parameters.";
pub const REPLY_NOT_IMPLEMENTED: &str = "502 Command not implemented.";
pub const REPLY_INVALID_COMMAND: &str = "500 Invalid command.";
pub const REPLY_INTERNAL_ERROR: &str = "500 Internal server error.";
pub const REPLY_USE_PASV_FIRST: &str = "425 Use PASV first.";
pub const REPLY_CLOSING: &str = "421 Service closing control connection.";
pub const REPLY_DATA_CONNECTION_FAILED: &str = "425 Can't open data connection.";
