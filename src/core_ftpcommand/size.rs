use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

pub struct Size;

#[async_trait]
impl CommandHandler for Size {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let path = session.build_path(param);
        match session.driver.file_size(&path).await {
            Ok(bytes) => session.write_message(213, &bytes.to_string()).await,
            Err(e) => {
                session.logger.print(&format!("SIZE {} failed: {}", path, e));
                session.write_message(450, "file not available").await
            }
        }
    }
}
