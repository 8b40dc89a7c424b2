use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the TYPE FTP command.
///
/// Transfers are always binary; the reply only acknowledges the request.
pub struct Type;

#[async_trait]
impl CommandHandler for Type {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        false
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        match param.to_ascii_uppercase().as_str() {
            "A" => session.write_message(200, "Type set to ASCII").await,
            "I" | "L 8" => session.write_message(200, "Type set to binary").await,
            _ => session.write_message(500, "Invalid type").await,
        }
    }
}
