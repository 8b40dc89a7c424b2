#[allow(clippy::module_inception)]
pub mod core_auth;
pub mod helper;

pub use core_auth::PasswdEntry;
pub use helper::{hash_password, load_passwd_file, parse_passwd, verify_password};
