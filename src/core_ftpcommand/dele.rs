use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

pub struct Dele;

#[async_trait]
impl CommandHandler for Dele {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let path = session.build_path(param);
        if session.driver.delete_file(&path).await {
            session.write_message(250, "File deleted").await
        } else {
            session.write_message(550, "Action not taken").await
        }
    }
}
