//! A driver serving a local directory tree, authenticating against a bcrypt
//! passwd file. This is the driver the `ferroftpd` binary runs with.

use crate::config::StorageConfig;
use crate::core_auth::{load_passwd_file, verify_password, PasswdEntry};
use crate::core_driver::{
    DriverError, FileInfo, FileKind, FileReader, FileWriter, FtpDriver, FtpDriverFactory,
};
use crate::core_fs::clean_path;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use filetime::FileTime;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::Metadata;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};

pub struct FsDriverFactory {
    root: PathBuf,
    users: Arc<HashMap<String, PasswdEntry>>,
}

impl FsDriverFactory {
    pub fn new(root: PathBuf, users: HashMap<String, PasswdEntry>) -> Self {
        Self {
            root,
            users: Arc::new(users),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Result<Self> {
        let root = storage.root_dir.canonicalize().with_context(|| {
            format!("Failed to resolve root directory: {}", storage.root_dir.display())
        })?;
        let users = load_passwd_file(&storage.passwd_file)?;
        Ok(Self::new(root, users))
    }
}

impl FtpDriverFactory for FsDriverFactory {
    fn new_driver(&self) -> Result<Box<dyn FtpDriver>, DriverError> {
        Ok(Box::new(FsDriver {
            root: self.root.clone(),
            users: Arc::clone(&self.users),
            cwd: String::from("/"),
        }))
    }
}

pub struct FsDriver {
    root: PathBuf,
    users: Arc<HashMap<String, PasswdEntry>>,
    cwd: String,
}

impl FsDriver {
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = clean_path(path);
        self.root.join(clean.trim_start_matches('/'))
    }

    async fn metadata(&self, path: &str) -> Result<Metadata, DriverError> {
        fs::metadata(self.resolve(path))
            .await
            .map_err(|e| DriverError::from_io(path, e))
    }
}

fn modified_time(metadata: &Metadata) -> DateTime<Utc> {
    let mtime = FileTime::from_last_modification_time(metadata);
    Utc.timestamp_opt(mtime.unix_seconds(), mtime.nanoseconds())
        .single()
        .unwrap_or_else(Utc::now)
}

fn file_info(name: String, metadata: &Metadata) -> FileInfo {
    let kind = if metadata.file_type().is_symlink() {
        FileKind::Symlink
    } else if metadata.is_dir() {
        FileKind::Directory
    } else {
        FileKind::File
    };
    FileInfo::new(name, metadata.len(), kind, modified_time(metadata))
}

#[async_trait]
impl FtpDriver for FsDriver {
    async fn authenticate(&mut self, username: &str, password: &str) -> bool {
        let Some(entry) = self.users.get(username) else {
            debug!("Unknown user: {}", username);
            return false;
        };
        let password = password.to_string();
        let hashed = entry.get_hashed_password().to_string();
        // bcrypt verification blocks for tens of milliseconds.
        tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .unwrap_or(false)
    }

    async fn change_dir(&mut self, path: &str) -> bool {
        match self.metadata(path).await {
            Ok(metadata) if metadata.is_dir() => {
                self.cwd = clean_path(path);
                true
            }
            _ => false,
        }
    }

    fn current_dir(&self) -> String {
        self.cwd.clone()
    }

    async fn list_entries(&self, path: &str) -> Result<Vec<FileInfo>, DriverError> {
        let metadata = self.metadata(path).await?;
        if !metadata.is_dir() {
            return Err(DriverError::NotADirectory(path.to_string()));
        }

        let mut dir = fs::read_dir(self.resolve(path))
            .await
            .map_err(|e| DriverError::from_io(path, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let metadata = match fs::symlink_metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Failed to get metadata for entry: {:?}, error: {}", entry.path(), e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(file_info(name, &metadata));
        }
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    async fn open_for_read(&self, path: &str) -> Result<FileReader, DriverError> {
        let metadata = self.metadata(path).await?;
        if !metadata.is_file() {
            return Err(DriverError::NotFound(path.to_string()));
        }
        let file = File::open(self.resolve(path))
            .await
            .map_err(|e| DriverError::from_io(path, e))?;
        Ok(Box::new(file))
    }

    async fn open_for_write(&self, path: &str, append: bool) -> Result<FileWriter, DriverError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(self.resolve(path))
            .await
            .map_err(|e| DriverError::from_io(path, e))?;
        Ok(Box::new(file))
    }

    async fn delete_file(&self, path: &str) -> bool {
        fs::remove_file(self.resolve(path)).await.is_ok()
    }

    async fn make_dir(&self, path: &str) -> bool {
        fs::create_dir(self.resolve(path)).await.is_ok()
    }

    async fn remove_dir(&self, path: &str) -> bool {
        if clean_path(path) == "/" {
            return false;
        }
        fs::remove_dir(self.resolve(path)).await.is_ok()
    }

    async fn rename(&self, from: &str, to: &str) -> bool {
        fs::rename(self.resolve(from), self.resolve(to)).await.is_ok()
    }

    async fn file_size(&self, path: &str) -> Result<u64, DriverError> {
        let metadata = self.metadata(path).await?;
        if !metadata.is_file() {
            return Err(DriverError::NotFound(path.to_string()));
        }
        Ok(metadata.len())
    }

    async fn mod_time(&self, path: &str) -> Result<DateTime<Utc>, DriverError> {
        let metadata = self.metadata(path).await?;
        Ok(modified_time(&metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn driver_for(root: &std::path::Path) -> Box<dyn FtpDriver> {
        let hashed = bcrypt::hash("secret", 4).unwrap();
        let mut users = HashMap::new();
        users.insert("bob".to_string(), PasswdEntry::new("bob", hashed));
        FsDriverFactory::new(root.to_path_buf(), users)
            .new_driver()
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = driver_for(dir.path());
        assert!(driver.authenticate("bob", "secret").await);
        assert!(!driver.authenticate("bob", "nope").await);
        assert!(!driver.authenticate("eve", "secret").await);
    }

    #[tokio::test]
    async fn test_write_read_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let driver = driver_for(dir.path());

        let mut writer = driver.open_for_write("/hello.txt", false).await.unwrap();
        writer.write_all(b"hello").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut writer = driver.open_for_write("/hello.txt", true).await.unwrap();
        writer.write_all(b" world").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut reader = driver.open_for_read("/hello.txt").await.unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello world");
        assert_eq!(driver.file_size("/hello.txt").await.unwrap(), 11);

        assert!(driver.make_dir("/sub").await);
        let entries = driver.list_entries("/").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["hello.txt", "sub"]);
        assert!(entries[1].is_dir());

        assert!(matches!(
            driver.list_entries("/hello.txt").await,
            Err(DriverError::NotADirectory(_))
        ));
        assert!(matches!(
            driver.list_entries("/missing").await,
            Err(DriverError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_change_dir_tracks_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pub")).unwrap();
        std::fs::write(dir.path().join("file"), b"x").unwrap();
        let mut driver = driver_for(dir.path());

        assert_eq!(driver.current_dir(), "/");
        assert!(driver.change_dir("/pub").await);
        assert_eq!(driver.current_dir(), "/pub");
        assert!(!driver.change_dir("/file").await);
        assert!(!driver.change_dir("/missing").await);
        assert_eq!(driver.current_dir(), "/pub");
    }

    #[tokio::test]
    async fn test_paths_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let driver = driver_for(dir.path());
        let mut writer = driver
            .open_for_write("/../../escape.txt", false)
            .await
            .unwrap();
        writer.shutdown().await.unwrap();
        assert!(dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_rename_delete_and_rmdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        let driver = driver_for(dir.path());

        assert!(driver.rename("/a.txt", "/b.txt").await);
        assert!(!driver.rename("/a.txt", "/c.txt").await);
        assert!(driver.mod_time("/b.txt").await.is_ok());
        assert!(driver.delete_file("/b.txt").await);
        assert!(!driver.delete_file("/b.txt").await);

        assert!(driver.make_dir("/d").await);
        assert!(driver.remove_dir("/d").await);
        assert!(!driver.remove_dir("/").await);
    }
}
