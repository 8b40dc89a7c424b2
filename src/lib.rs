//! ferroftpd - an FTP protocol engine.
//!
//! The engine speaks the FTP control protocol over any byte stream and
//! manages the data channel for transfers and listings. Storage is supplied
//! by an [`FtpDriver`](core_driver::FtpDriver) created per session by a
//! [`FtpDriverFactory`](core_driver::FtpDriverFactory).

pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_driver;
pub mod core_fs;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod server;
pub mod session;

pub use config::{Config, ServerConfig, StorageConfig};
pub use core_driver::{FileInfo, FileKind, FtpDriver, FtpDriverFactory};
pub use core_network::network::FtpServer;
pub use session::Session;
