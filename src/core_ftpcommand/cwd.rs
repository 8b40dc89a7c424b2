use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;

/// Handles the CWD and XCWD FTP commands.
pub struct Cwd;

/// Changes the session's directory prefix if the driver accepts `param`.
pub(crate) async fn change_dir(session: &mut Session, param: &str) -> io::Result<()> {
    let path = session.build_path(param);
    if session.driver.change_dir(&path).await {
        let message = format!("Directory changed to {}", path);
        session.name_prefix = path;
        session.write_message(250, &message).await
    } else {
        session.write_message(550, "Action not taken").await
    }
}

#[async_trait]
impl CommandHandler for Cwd {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        change_dir(session, param).await
    }
}
