use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the MKD FTP command.
pub struct Mkd;

#[async_trait]
impl CommandHandler for Mkd {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let path = session.build_path(param);
        if session.driver.make_dir(&path).await {
            session.write_message(257, "Directory created").await
        } else {
            session.write_message(550, "Action not taken").await
        }
    }
}
