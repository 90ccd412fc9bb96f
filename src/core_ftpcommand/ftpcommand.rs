use std::fmt;
use std::str::FromStr;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    AUTH,
    PBSZ,
    PROT,
    FEAT,
    SYST,
    CWD,
    CDUP,
    PWD,
    TYPE,
    PORT,
    PASV,
    LIST,
    RETR,
    STOR,
    DELE,
}

impl FtpCommand {
    pub const ALL: [FtpCommand; 18] = [
        FtpCommand::USER,
        FtpCommand::PASS,
        FtpCommand::QUIT,
        FtpCommand::AUTH,
        FtpCommand::PBSZ,
        FtpCommand::PROT,
        FtpCommand::FEAT,
        FtpCommand::SYST,
        FtpCommand::CWD,
        FtpCommand::CDUP,
        FtpCommand::PWD,
        FtpCommand::TYPE,
        FtpCommand::PORT,
        FtpCommand::PASV,
        FtpCommand::LIST,
        FtpCommand::RETR,
        FtpCommand::STOR,
        FtpCommand::DELE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::AUTH => "AUTH",
            FtpCommand::PBSZ => "PBSZ",
            FtpCommand::PROT => "PROT",
            FtpCommand::FEAT => "FEAT",
            FtpCommand::SYST => "SYST",
            FtpCommand::CWD => "CWD",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::PWD => "PWD",
            FtpCommand::TYPE => "TYPE",
            FtpCommand::PORT => "PORT",
            FtpCommand::PASV => "PASV",
            FtpCommand::LIST => "LIST",
            FtpCommand::RETR => "RETR",
            FtpCommand::STOR => "STOR",
            FtpCommand::DELE => "DELE",
        }
    }
}

impl FromStr for FtpCommand {
    type Err = ();

    fn from_str(cmd: &str) -> Result<Self, Self::Err> {
        let upper = cmd.to_ascii_uppercase();
        FtpCommand::ALL
            .into_iter()
            .find(|command| command.as_str() == upper)
            .ok_or(())
    }
}

/// One command line as read from the control channel: the uppercased verb
/// and the raw line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    verb: String,
    line: String,
}

impl CommandLine {
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let verb = line.split_whitespace().next()?.to_ascii_uppercase();
        Some(Self {
            verb,
            line: line.to_string(),
        })
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Everything after the verb, trimmed. `None` if nothing follows it.
    pub fn argument(&self) -> Option<&str> {
        self.line
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .filter(|rest| !rest.is_empty())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.verb == "PASS" {
            write!(f, "PASS ****")
        } else {
            write!(f, "{}", self.line)
        }
    }
}
