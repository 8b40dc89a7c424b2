use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the USER FTP command.
///
/// Stages the requested username; it is only checked once PASS arrives.
pub struct User;

#[async_trait]
impl CommandHandler for User {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        session.req_user = Some(param.to_string());
        session.write_message(331, "User name ok, password required").await
    }
}
