//! A passive-mode FTP server with optional explicit or implicit TLS.
//!
//! [`Server`] owns the control listener and spawns one task per client. Each
//! task keeps its own [`session::Session`] and dispatches commands through
//! the shared [`core_ftpcommand::CommandRegistry`].

pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_ftpcommand;
pub mod core_listing;
pub mod core_log;
pub mod core_network;
pub mod core_storage;
pub mod core_tls;
pub mod helpers;
pub mod server;
pub mod session;

pub use config::Config;
pub use server::{Server, ServerStatus};
