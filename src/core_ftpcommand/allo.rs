use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the ALLO FTP command. Storage is never preallocated.
pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        session.write_message(202, "Obsolete").await
    }
}
