use crate::core_ftpcommand::cwd::change_dir;
use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the CDUP and XCUP FTP commands: CWD to the parent directory.
pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        change_dir(session, "..").await
    }
}
