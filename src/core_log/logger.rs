use log::{debug, info, warn};

/// Session-scoped logger. Every line is prefixed with the session id so that
/// interleaved sessions can be told apart.
#[derive(Debug, Clone)]
pub struct FtpLogger {
    session_id: String,
}

impl FtpLogger {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn print(&self, message: &str) {
        info!("{} {}", self.session_id, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{} {}", self.session_id, message);
    }

    pub fn print_command(&self, verb: &str, param: &str) {
        debug!("{} > {}", self.session_id, format_command(verb, param));
    }

    pub fn print_response(&self, code: u16, message: &str) {
        debug!("{} < {} {}", self.session_id, code, message);
    }
}

/// Renders a command for the log, hiding passwords.
pub fn format_command(verb: &str, param: &str) -> String {
    if param.is_empty() {
        verb.to_string()
    } else if verb == "PASS" {
        format!("{} ****", verb)
    } else {
        format!("{} {}", verb, param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_masks_password() {
        assert_eq!(format_command("PASS", "hunter2"), "PASS ****");
        assert_eq!(format_command("USER", "bob"), "USER bob");
        assert_eq!(format_command("PWD", ""), "PWD");
    }

    #[test]
    fn test_session_id() {
        let logger = FtpLogger::new("abc123");
        assert_eq!(logger.session_id(), "abc123");
    }
}
