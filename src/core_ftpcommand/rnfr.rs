use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the RNFR FTP command by remembering the source path for RNTO.
pub struct Rnfr;

#[async_trait]
impl CommandHandler for Rnfr {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        session.rename_from = Some(session.build_path(param));
        session
            .write_message(350, "Requested file action pending further information.")
            .await
    }
}
