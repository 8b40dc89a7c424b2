use crate::core_ftpcommand::{
    allo::Allo, cdup::Cdup, cwd::Cwd, dele::Dele, list::List, mdtm::Mdtm, mkd::Mkd, mode::Mode,
    nlst::Nlst, noop::Noop, pass::Pass, pwd::Pwd, quit::Quit, retr::Retr, rmd::Rmd, rnfr::Rnfr,
    rnto::Rnto, size::Size, stor::Stor, stru::Stru, syst::Syst, type_::Type, user::User,
};
use crate::core_network::{
    pasv::{Epsv, Pasv},
    port::{Eprt, Port},
};
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// One FTP verb. The session checks `require_param` and `require_auth`
/// before calling `execute`, which must write the reply itself.
///
/// An `Err` from `execute` means the control connection is unusable and the
/// session ends.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn require_param(&self) -> bool;

    fn require_auth(&self) -> bool;

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()>;
}

pub type CommandTable = HashMap<&'static str, Arc<dyn CommandHandler>>;

pub fn initialize_command_handlers() -> CommandTable {
    let mut handlers: CommandTable = HashMap::new();

    let cdup: Arc<dyn CommandHandler> = Arc::new(Cdup);
    let cwd: Arc<dyn CommandHandler> = Arc::new(Cwd);
    let pwd: Arc<dyn CommandHandler> = Arc::new(Pwd);
    let rmd: Arc<dyn CommandHandler> = Arc::new(Rmd);

    handlers.insert("ALLO", Arc::new(Allo));
    handlers.insert("CDUP", Arc::clone(&cdup));
    handlers.insert("CWD", Arc::clone(&cwd));
    handlers.insert("DELE", Arc::new(Dele));
    handlers.insert("EPRT", Arc::new(Eprt));
    handlers.insert("EPSV", Arc::new(Epsv));
    handlers.insert("LIST", Arc::new(List));
    handlers.insert("NLST", Arc::new(Nlst));
    handlers.insert("MDTM", Arc::new(Mdtm));
    handlers.insert("MKD", Arc::new(Mkd));
    handlers.insert("MODE", Arc::new(Mode));
    handlers.insert("NOOP", Arc::new(Noop));
    handlers.insert("PASS", Arc::new(Pass));
    handlers.insert("PASV", Arc::new(Pasv));
    handlers.insert("PORT", Arc::new(Port));
    handlers.insert("PWD", Arc::clone(&pwd));
    handlers.insert("QUIT", Arc::new(Quit));
    handlers.insert("RETR", Arc::new(Retr));
    handlers.insert("RMD", Arc::clone(&rmd));
    handlers.insert("RNFR", Arc::new(Rnfr));
    handlers.insert("RNTO", Arc::new(Rnto));
    handlers.insert("SIZE", Arc::new(Size));
    handlers.insert("STOR", Arc::new(Stor));
    handlers.insert("STRU", Arc::new(Stru));
    handlers.insert("SYST", Arc::new(Syst));
    handlers.insert("TYPE", Arc::new(Type));
    handlers.insert("USER", Arc::new(User));

    // RFC 775 aliases
    handlers.insert("XCUP", cdup);
    handlers.insert("XCWD", cwd);
    handlers.insert("XPWD", pwd);
    handlers.insert("XRMD", rmd);

    handlers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_verb_is_registered() {
        let handlers = initialize_command_handlers();
        for verb in [
            "ALLO", "CDUP", "CWD", "DELE", "EPRT", "EPSV", "LIST", "NLST", "MDTM", "MKD", "MODE",
            "NOOP", "PASS", "PASV", "PORT", "PWD", "QUIT", "RETR", "RMD", "RNFR", "RNTO", "SIZE",
            "STOR", "STRU", "SYST", "TYPE", "USER", "XCUP", "XCWD", "XPWD", "XRMD",
        ] {
            assert!(handlers.contains_key(verb), "missing handler for {}", verb);
        }
        assert_eq!(handlers.len(), 31);
    }

    #[test]
    fn test_aliases_share_handler() {
        let handlers = initialize_command_handlers();
        for (alias, verb) in [("XCUP", "CDUP"), ("XCWD", "CWD"), ("XPWD", "PWD"), ("XRMD", "RMD")] {
            assert!(Arc::ptr_eq(&handlers[alias], &handlers[verb]));
        }
    }

    #[test]
    fn test_preconditions() {
        let handlers = initialize_command_handlers();
        // (verb, require_param, require_auth)
        let expected = [
            ("USER", true, false),
            ("PASS", true, false),
            ("QUIT", false, false),
            ("CWD", true, true),
            ("XCWD", true, true),
            ("CDUP", false, true),
            ("XCUP", false, true),
            ("PWD", false, true),
            ("XPWD", false, true),
            ("MKD", true, true),
            ("RMD", true, true),
            ("XRMD", true, true),
            ("DELE", true, true),
            ("RNFR", true, true),
            ("RNTO", true, true),
            ("SIZE", true, true),
            ("MDTM", true, true),
            ("TYPE", true, false),
            ("MODE", true, false),
            ("STRU", true, false),
            ("PASV", false, true),
            ("EPSV", false, true),
            ("PORT", true, true),
            ("EPRT", true, true),
            ("LIST", false, true),
            ("NLST", false, true),
            ("RETR", true, true),
            ("STOR", true, true),
            ("SYST", false, false),
            ("NOOP", false, false),
            ("ALLO", true, false),
        ];
        assert_eq!(expected.len(), handlers.len());
        for (verb, param, auth) in expected {
            let handler = &handlers[verb];
            assert_eq!(handler.require_param(), param, "require_param of {}", verb);
            assert_eq!(handler.require_auth(), auth, "require_auth of {}", verb);
        }
    }
}
