use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the RETR FTP command.
///
/// Streams the file from the driver to the data channel, which is closed
/// once the transfer ends.
pub struct Retr;

#[async_trait]
impl CommandHandler for Retr {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        if !session.require_data_channel().await? {
            return Ok(());
        }

        let path = session.build_path(param);
        match session.driver.open_for_read(&path).await {
            Ok(mut reader) => {
                session.logger.print(&format!("Sending {}", path));
                session.write_message(150, "Data transfer starting").await?;
                session.send_out_of_band(&mut reader).await
            }
            Err(e) => {
                session.logger.print(&format!("RETR {} failed: {}", path, e));
                session.close_data_channel().await;
                session.write_message(551, "File not available").await
            }
        }
    }
}
