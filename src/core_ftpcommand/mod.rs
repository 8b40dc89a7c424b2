// One module per FTP verb. The dispatch table lives in `handlers`.
pub mod allo;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod handlers;
pub mod list;
pub mod mdtm;
pub mod mkd;
pub mod mode;
pub mod nlst;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stor;
pub mod stru;
pub mod syst;
pub mod type_;
pub mod user;

pub use handlers::{initialize_command_handlers, CommandHandler, CommandTable};
