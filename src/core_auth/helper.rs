use crate::constants::USERNAME_REGEX;
use crate::core_auth::core_auth::PasswdEntry;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use log::{info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

pub fn load_passwd_file(path: &Path) -> Result<HashMap<String, PasswdEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read passwd file: {}", path.display()))?;
    let passwd_map = parse_passwd(&content)?;
    info!(
        "Loaded {} user(s) from passwd file: {}",
        passwd_map.len(),
        path.display()
    );
    Ok(passwd_map)
}

/// Parses passwd file content. Blank lines and `#` comments are skipped;
/// malformed lines and invalid usernames are logged and ignored.
pub fn parse_passwd(content: &str) -> Result<HashMap<String, PasswdEntry>> {
    let username_re = Regex::new(USERNAME_REGEX)?;
    let mut passwd_map = HashMap::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match PasswdEntry::from_line(line) {
            Some(entry) if username_re.is_match(entry.get_username()) => {
                passwd_map.insert(entry.get_username().to_string(), entry);
            }
            Some(entry) => warn!(
                "Skipping passwd line {}: invalid username {:?}",
                number + 1,
                entry.get_username()
            ),
            None => warn!("Skipping malformed passwd line {}", number + 1),
        }
    }
    Ok(passwd_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = bcrypt::hash("secret", 4).unwrap();
        assert!(verify_password("secret", &hashed));
        assert!(!verify_password("wrong", &hashed));
        assert!(!verify_password("secret", "not-a-hash"));
    }

    #[test]
    fn test_parse_passwd_skips_invalid_lines() {
        let hashed = bcrypt::hash("secret", 4).unwrap();
        let content = format!(
            "# users\n\nbob:{hashed}\nbad user:{hashed}\ngarbage\nalice:{hashed}\n"
        );
        let users = parse_passwd(&content).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains_key("bob"));
        assert!(users.contains_key("alice"));
    }

    #[test]
    fn test_load_passwd_file_missing() {
        assert!(load_passwd_file(Path::new("/nonexistent/ferroftpd.passwd")).is_err());
    }
}
