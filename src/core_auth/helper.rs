use crate::core_auth::core_auth::PasswdEntry;
use anyhow::{Context, Result};
use bcrypt::verify;
use log::warn;
use std::collections::HashMap;
use std::path::Path;

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

pub fn parse_passwd(content: &str) -> HashMap<String, PasswdEntry> {
    let mut passwd_map = HashMap::new();
    for (number, line) in content.lines().enumerate() {
        match PasswdEntry::from_line(line) {
            Some(entry) => {
                passwd_map.insert(entry.get_username().to_string(), entry);
            }
            None if !line.trim().is_empty() && !line.trim_start().starts_with('#') => {
                warn!("Ignoring malformed passwd line {}", number + 1);
            }
            None => {}
        }
    }
    passwd_map
}

pub fn load_passwd_file(path: &Path) -> Result<HashMap<String, PasswdEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read passwd file: {}", path.display()))?;
    Ok(parse_passwd(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password() {
        let hashed = bcrypt::hash("secret", 4).unwrap();
        assert!(verify_password("secret", &hashed));
        assert!(!verify_password("wrong", &hashed));
        assert!(!verify_password("secret", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_parse_passwd_skips_bad_lines() {
        let entries = parse_passwd("alice:$2b$04$x\n\n# admin\nbroken\nbob:$2b$04$y\n");
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key("alice"));
        assert!(entries.contains_key("bob"));
    }
}
