use crate::core_fs::ListFormatter;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_ftpcommand::list::listing_path;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the NLST FTP command: names only, one per line.
pub struct Nlst;

#[async_trait]
impl CommandHandler for Nlst {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        if !session.require_data_channel().await? {
            return Ok(());
        }

        let path = listing_path(session, param);
        match session.driver.list_entries(&path).await {
            Ok(entries) => {
                let listing = ListFormatter::new(&entries).short();
                session
                    .write_message(150, "Opening ASCII mode data connection for file list")
                    .await?;
                session.send_out_of_band(&mut listing.as_bytes()).await
            }
            Err(_) => {
                session.close_data_channel().await;
                session.write_message(550, "Action not taken").await
            }
        }
    }
}
