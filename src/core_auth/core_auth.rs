/// One `username:bcrypt-hash` line of the passwd file.
#[derive(Debug, Clone)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
}

impl PasswdEntry {
    pub fn new(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hashed_password: hashed_password.into(),
        }
    }

    /// Parses a passwd line. bcrypt hashes never contain ':' so the first
    /// separator splits name from hash.
    pub fn from_line(line: &str) -> Option<Self> {
        let (username, hashed_password) = line.split_once(':')?;
        if username.is_empty() || hashed_password.is_empty() || hashed_password.contains(':') {
            return None;
        }
        Some(PasswdEntry::new(username, hashed_password))
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line() {
        let entry = PasswdEntry::from_line("bob:$2b$04$abcdefghijklmnopqrstuv").unwrap();
        assert_eq!(entry.get_username(), "bob");
        assert_eq!(entry.get_hashed_password(), "$2b$04$abcdefghijklmnopqrstuv");
    }

    #[test]
    fn test_from_line_rejects_malformed() {
        assert!(PasswdEntry::from_line("nobody").is_none());
        assert!(PasswdEntry::from_line(":hash").is_none());
        assert!(PasswdEntry::from_line("bob:").is_none());
        assert!(PasswdEntry::from_line("bob:a:b").is_none());
    }
}
