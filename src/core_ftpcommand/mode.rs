use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the MODE FTP command. Only stream mode is supported.
pub struct Mode;

#[async_trait]
impl CommandHandler for Mode {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        if param.eq_ignore_ascii_case("S") {
            session.write_message(200, "OK").await
        } else {
            session.write_message(504, "MODE is an obsolete command").await
        }
    }
}
