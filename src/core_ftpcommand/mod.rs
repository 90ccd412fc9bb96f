// Here's the list of the FTP commands implemented
pub mod auth;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod handlers;
pub mod list;
pub mod pass;
pub mod pasv;
pub mod pbsz;
pub mod port;
pub mod prot;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Parsing, errors and the helpers shared by the handlers
pub mod error;
pub mod ftpcommand;
pub mod utils;

pub use error::CommandError;
pub use ftpcommand::{CommandLine, FtpCommand};
pub use handlers::{CommandHandler, CommandRegistry};
