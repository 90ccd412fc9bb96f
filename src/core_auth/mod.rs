pub mod authenticator;
pub mod core_auth;
pub mod helper;

pub use authenticator::{Authenticator, ChainAuthenticator, PasswdAuthenticator, StaticAuthenticator};
