use crate::core_fs::ListFormatter;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the LIST FTP command with an `ls -l` style listing.
pub struct List;

/// Resolves the directory to list. Arguments starting with `-` are `ls`
/// flags sent by some clients and are ignored.
pub(crate) fn listing_path(session: &Session, param: &str) -> String {
    if param.starts_with('-') {
        session.build_path("")
    } else {
        session.build_path(param)
    }
}

#[async_trait]
impl CommandHandler for List {
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
                let listing = ListFormatter::new(&entries).detailed();
                session
                    .write_message(150, "Opening ASCII mode data connection for file list")
                    .await?;
                session.send_out_of_band(&mut listing.as_bytes()).await
            }
            Err(e) => {
                session.logger.print(&format!("LIST {} failed: {}", path, e));
                session.close_data_channel().await;
                session.write_message(550, "Action not taken").await
            }
        }
    }
}
