use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        let message = format!("\"{}\" is the current directory", session.name_prefix);
        session.write_message(257, &message).await
    }
}
