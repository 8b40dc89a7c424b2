use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the RNTO FTP command.
///
/// The source staged by RNFR is cleared whether or not the rename succeeds.
pub struct Rnto;

#[async_trait]
impl CommandHandler for Rnto {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let Some(from) = session.rename_from.take() else {
            return session.write_message(503, "Bad sequence of commands.").await;
        };

        let to = session.build_path(param);
        if session.driver.rename(&from, &to).await {
            session.logger.print(&format!("Renamed {} to {}", from, to));
            session.write_message(250, "File renamed").await
        } else {
            session.write_message(550, "Action not taken").await
        }
    }
}
