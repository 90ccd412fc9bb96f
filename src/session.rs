use crate::constants::UNAUTHENTICATED_COMMANDS;
use crate::helpers::{parent_path, resolve_path};
use tokio::net::TcpListener;

/// Where a session sits in the USER/PASS exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    AwaitingPassword,
    Authenticated,
}

/// Per-connection state. Owned by exactly one worker task for the lifetime
/// of its control connection, so it needs no locking.
#[derive(Debug)]
pub struct Session {
    pub username: Option<String>, // Username for the session
    pub is_authenticated: bool,   // Set once PASS succeeds
    pub current_dir: String,      // Logical path, always absolute and '/'-separated
    pub data_listener: Option<TcpListener>, // At most one live PASV listener
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            username: None,
            is_authenticated: false,
            current_dir: String::from("/"),
            data_listener: None,
        }
    }

    pub fn login_state(&self) -> LoginState {
        match (&self.username, self.is_authenticated) {
            (_, true) => LoginState::Authenticated,
            (Some(_), false) => LoginState::AwaitingPassword,
            (None, false) => LoginState::Unauthenticated,
        }
    }

    /// Starts a new login attempt. Any previous login is dropped.
    pub fn begin_login(&mut self, username: &str) {
        self.username = Some(username.to_string());
        self.is_authenticated = false;
    }

    /// Whether `verb` (already uppercased) may run in the current login state.
    pub fn is_command_allowed(&self, verb: &str) -> bool {
        self.is_authenticated || UNAUTHENTICATED_COMMANDS.contains(&verb)
    }

    /// Resolves `path` against the current directory without touching storage.
    pub fn resolve(&self, path: &str) -> String {
        resolve_path(&self.current_dir, path)
    }

    pub fn change_dir(&mut self, path: &str) {
        self.current_dir = self.resolve(path);
    }

    /// Moves to the parent directory. Returns `false` (and changes nothing) at `/`.
    pub fn change_dir_up(&mut self) -> bool {
        match parent_path(&self.current_dir) {
            Some(parent) => {
                self.current_dir = parent;
                true
            }
            None => false,
        }
    }

    pub fn has_data_listener(&self) -> bool {
        self.data_listener.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_unauthenticated_at_root() {
        let session = Session::new();
        assert_eq!(session.login_state(), LoginState::Unauthenticated);
        assert_eq!(session.current_dir, "/");
        assert!(!session.has_data_listener());
    }

    #[test]
    fn test_login_state_transitions() {
        let mut session = Session::new();
        session.begin_login("test");
        assert_eq!(session.login_state(), LoginState::AwaitingPassword);

        session.is_authenticated = true;
        assert_eq!(session.login_state(), LoginState::Authenticated);

        // USER again always drops back to awaiting a password
        session.begin_login("other");
        assert_eq!(session.login_state(), LoginState::AwaitingPassword);
        assert_eq!(session.username.as_deref(), Some("other"));
        assert!(!session.is_authenticated);
    }

    #[test]
    fn test_command_gate() {
        let mut session = Session::new();
        for verb in ["USER", "PASS", "QUIT", "AUTH"] {
            assert!(session.is_command_allowed(verb));
        }
        for verb in ["LIST", "PWD", "PASV", "FEAT", "SYST", "PBSZ"] {
            assert!(!session.is_command_allowed(verb));
        }

        session.is_authenticated = true;
        assert!(session.is_command_allowed("LIST"));
    }

    #[test]
    fn test_change_dir_and_up() {
        let mut session = Session::new();
        session.change_dir("docs");
        assert_eq!(session.current_dir, "/docs");
        session.change_dir("reports/2024");
        assert_eq!(session.current_dir, "/docs/reports/2024");

        assert!(session.change_dir_up());
        assert_eq!(session.current_dir, "/docs/reports");

        session.change_dir("/");
        assert!(!session.change_dir_up());
        assert_eq!(session.current_dir, "/");
    }
}
