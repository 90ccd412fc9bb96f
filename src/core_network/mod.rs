pub mod connection;
pub mod network;
pub mod pasv;

pub use connection::FtpConnection;
pub use network::{handle_connection, ConnectionListener, PendingConnection};
pub use pasv::{DataChannelError, PassiveDataChannel};
