use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the MDTM FTP command (RFC 3659). The reply is in UTC.
pub struct Mdtm;

#[async_trait]
impl CommandHandler for Mdtm {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let path = session.build_path(param);
        match session.driver.mod_time(&path).await {
            Ok(modified) => {
                let timestamp = modified.format("%Y%m%d%H%M%S").to_string();
                session.write_message(213, &timestamp).await
            }
            Err(_) => session.write_message(450, "File not available").await,
        }
    }
}
