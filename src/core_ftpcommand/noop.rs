use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

pub struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        session.write_message(200, "OK").await
    }
}
