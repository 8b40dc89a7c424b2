use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the STOR FTP command.
///
/// Existing files are replaced. The upload is committed when the data
/// connection reaches EOF and the driver's writer has been shut down.
pub struct Stor;

#[async_trait]
impl CommandHandler for Stor {
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
        match session.driver.open_for_write(&path, false).await {
            Ok(mut writer) => {
                session.logger.print(&format!("Receiving {}", path));
                session.write_message(150, "Data transfer starting").await?;
                session.receive_out_of_band(&mut writer).await
            }
            Err(e) => {
                session.logger.warn(&format!("STOR {} failed: {}", path, e));
                session.close_data_channel().await;
                session.write_message(550, "Action not taken").await
            }
        }
    }
}
