//! Storage driver interface.
//!
//! The engine never touches storage itself: every effect of a command goes
//! through the [`FtpDriver`] owned by the session. Paths handed to a driver
//! are always absolute and lexically clean (see [`crate::core_fs::build_path`]),
//! but the driver is still responsible for scoping them to its own sandbox.

pub mod error;
pub mod file_info;
pub mod fs_driver;
pub mod memory;

pub use error::DriverError;
pub use file_info::{FileInfo, FileKind};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite};

pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;
pub type FileWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[async_trait]
pub trait FtpDriver: Send + Sync {
    /// Checks the credentials staged by USER/PASS.
    async fn authenticate(&mut self, username: &str, password: &str) -> bool;

    async fn change_dir(&mut self, path: &str) -> bool;

    /// The directory last accepted by [`FtpDriver::change_dir`].
    fn current_dir(&self) -> String;

    async fn list_entries(&self, path: &str) -> Result<Vec<FileInfo>, DriverError>;

    async fn open_for_read(&self, path: &str) -> Result<FileReader, DriverError>;

    /// Returns a sink for STOR. Data is only guaranteed to be persisted once
    /// the writer has been shut down.
    async fn open_for_write(&self, path: &str, append: bool) -> Result<FileWriter, DriverError>;

    async fn delete_file(&self, path: &str) -> bool;

    async fn make_dir(&self, path: &str) -> bool;

    async fn remove_dir(&self, path: &str) -> bool;

    async fn rename(&self, from: &str, to: &str) -> bool;

    async fn file_size(&self, path: &str) -> Result<u64, DriverError>;

    async fn mod_time(&self, path: &str) -> Result<DateTime<Utc>, DriverError>;
}

/// Creates one driver per accepted connection.
pub trait FtpDriverFactory: Send + Sync {
    fn new_driver(&self) -> Result<Box<dyn FtpDriver>, DriverError>;
}
