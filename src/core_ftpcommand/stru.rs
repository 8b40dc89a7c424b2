use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the STRU FTP command. Only file structure is supported.
pub struct Stru;

#[async_trait]
impl CommandHandler for Stru {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        if param.eq_ignore_ascii_case("F") {
            session.write_message(200, "OK").await
        } else {
            session.write_message(504, "STRU is an obsolete command").await
        }
    }
}
