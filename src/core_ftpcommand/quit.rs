use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the QUIT FTP command.
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        session.write_message(221, "Goodbye").await?;
        session.closing = true;
        Ok(())
    }
}
