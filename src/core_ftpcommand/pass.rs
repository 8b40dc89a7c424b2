use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the PASS FTP command.
///
/// Authenticates the username staged by USER through the driver. The staged
/// name is consumed whatever the outcome, so a failed attempt needs a new USER.
pub struct Pass;

#[async_trait]
impl CommandHandler for Pass {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        let Some(username) = session.req_user.take() else {
            return session.write_message(503, "Login with USER first.").await;
        };

        if session.driver.authenticate(&username, param).await {
            session.logger.print(&format!("User {} logged in", username));
            session.user = username;
            session.write_message(230, "Password ok, continue").await
        } else {
            session.logger.warn(&format!("Failed login for user {}", username));
            session
                .write_message(530, "Incorrect password, not logged in")
                .await
        }
    }
}
