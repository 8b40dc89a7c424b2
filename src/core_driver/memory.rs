//! An in-memory driver. Every driver created by one [`MemoryDriverFactory`]
//! shares the same store, so all sessions see each other's uploads.

use crate::core_driver::{
    DriverError, FileInfo, FileReader, FileWriter, FtpDriver, FtpDriverFactory,
};
use crate::core_fs::clean_path;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

#[derive(Debug, Clone)]
struct MemoryFile {
    data: Vec<u8>,
    modified: DateTime<Utc>,
}

#[derive(Debug)]
struct MemoryStore {
    users: HashMap<String, String>,
    dirs: BTreeSet<String>,
    files: BTreeMap<String, MemoryFile>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(String::from("/"));
        Self {
            users: HashMap::new(),
            dirs,
            files: BTreeMap::new(),
        }
    }
}

impl MemoryStore {
    fn exists(&self, path: &str) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn parent_exists(&self, path: &str) -> bool {
        self.dirs.contains(&parent_of(path))
    }
}

type SharedStore = Arc<Mutex<MemoryStore>>;

fn lock(store: &SharedStore) -> MutexGuard<'_, MemoryStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) | None => String::from("/"),
        Some((parent, _)) => parent.to_string(),
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryDriverFactory {
    store: SharedStore,
}

impl MemoryDriverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, password: &str) -> Self {
        lock(&self.store)
            .users
            .insert(username.to_string(), password.to_string());
        self
    }

    /// Creates or replaces a file, creating no parent directories.
    pub fn add_file(&self, path: &str, data: &[u8], modified: DateTime<Utc>) {
        lock(&self.store).files.insert(
            clean_path(path),
            MemoryFile {
                data: data.to_vec(),
                modified,
            },
        );
    }

    pub fn add_dir(&self, path: &str) {
        lock(&self.store).dirs.insert(clean_path(path));
    }

    pub fn file_contents(&self, path: &str) -> Option<Vec<u8>> {
        lock(&self.store)
            .files
            .get(&clean_path(path))
            .map(|file| file.data.clone())
    }

    pub fn has_dir(&self, path: &str) -> bool {
        lock(&self.store).dirs.contains(&clean_path(path))
    }
}

impl FtpDriverFactory for MemoryDriverFactory {
    fn new_driver(&self) -> Result<Box<dyn FtpDriver>, DriverError> {
        Ok(Box::new(MemoryDriver {
            store: Arc::clone(&self.store),
            cwd: String::from("/"),
        }))
    }
}

pub struct MemoryDriver {
    store: SharedStore,
    cwd: String,
}

#[async_trait]
impl FtpDriver for MemoryDriver {
    async fn authenticate(&mut self, username: &str, password: &str) -> bool {
        lock(&self.store)
            .users
            .get(username)
            .is_some_and(|expected| expected == password)
    }

    async fn change_dir(&mut self, path: &str) -> bool {
        let path = clean_path(path);
        if lock(&self.store).dirs.contains(&path) {
            self.cwd = path;
            true
        } else {
            false
        }
    }

    fn current_dir(&self) -> String {
        self.cwd.clone()
    }

    async fn list_entries(&self, path: &str) -> Result<Vec<FileInfo>, DriverError> {
        let path = clean_path(path);
        let store = lock(&self.store);
        if !store.dirs.contains(&path) {
            return Err(if store.files.contains_key(&path) {
                DriverError::NotADirectory(path)
            } else {
                DriverError::NotFound(path)
            });
        }

        let mut entries: Vec<FileInfo> = store
            .dirs
            .iter()
            .filter(|dir| dir.as_str() != "/" && parent_of(dir) == path)
            .map(|dir| FileInfo::new_dir_item(name_of(dir)))
            .collect();
        entries.extend(
            store
                .files
                .iter()
                .filter(|(file, _)| parent_of(file) == path)
                .map(|(file, content)| {
                    let size = content.data.len() as u64;
                    FileInfo::new_file_item(name_of(file), size, content.modified)
                }),
        );
        Ok(entries)
    }

    async fn open_for_read(&self, path: &str) -> Result<FileReader, DriverError> {
        let path = clean_path(path);
        match lock(&self.store).files.get(&path) {
            Some(file) => Ok(Box::new(Cursor::new(file.data.clone()))),
            None => Err(DriverError::NotFound(path)),
        }
    }

    async fn open_for_write(&self, path: &str, append: bool) -> Result<FileWriter, DriverError> {
        let path = clean_path(path);
        let store = lock(&self.store);
        if store.dirs.contains(&path) || !store.parent_exists(&path) {
            return Err(DriverError::PermissionDenied(path));
        }
        let buffer = match store.files.get(&path) {
            Some(file) if append => file.data.clone(),
            _ => Vec::new(),
        };
        Ok(Box::new(MemoryWriter {
            store: Arc::clone(&self.store),
            path,
            buffer,
        }))
    }

    async fn delete_file(&self, path: &str) -> bool {
        lock(&self.store).files.remove(&clean_path(path)).is_some()
    }

    async fn make_dir(&self, path: &str) -> bool {
        let path = clean_path(path);
        let mut store = lock(&self.store);
        if store.exists(&path) || !store.parent_exists(&path) {
            return false;
        }
        store.dirs.insert(path)
    }

    async fn remove_dir(&self, path: &str) -> bool {
        let path = clean_path(path);
        let mut store = lock(&self.store);
        let has_children = store.dirs.iter().any(|d| d != "/" && parent_of(d) == path)
            || store.files.keys().any(|f| parent_of(f) == path);
        if path == "/" || has_children {
            return false;
        }
        store.dirs.remove(&path)
    }

    async fn rename(&self, from: &str, to: &str) -> bool {
        let (from, to) = (clean_path(from), clean_path(to));
        let mut store = lock(&self.store);
        if store.exists(&to) || !store.parent_exists(&to) {
            return false;
        }
        match store.files.remove(&from) {
            Some(file) => {
                store.files.insert(to, file);
                true
            }
            None => false,
        }
    }

    async fn file_size(&self, path: &str) -> Result<u64, DriverError> {
        let path = clean_path(path);
        match lock(&self.store).files.get(&path) {
            Some(file) => Ok(file.data.len() as u64),
            None => Err(DriverError::NotFound(path)),
        }
    }

    async fn mod_time(&self, path: &str) -> Result<DateTime<Utc>, DriverError> {
        let path = clean_path(path);
        match lock(&self.store).files.get(&path) {
            Some(file) => Ok(file.modified),
            None => Err(DriverError::NotFound(path)),
        }
    }
}

/// Buffers an upload and commits it to the store on shutdown.
struct MemoryWriter {
    store: SharedStore,
    path: String,
    buffer: Vec<u8>,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let file = MemoryFile {
            data: self.buffer.clone(),
            modified: Utc::now(),
        };
        lock(&self.store).files.insert(self.path.clone(), file);
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/a.txt"), "/");
        assert_eq!(parent_of("/pub/a.txt"), "/pub");
        assert_eq!(name_of("/pub/a.txt"), "a.txt");
    }

    #[tokio::test]
    async fn test_upload_is_committed_on_shutdown() {
        let factory = MemoryDriverFactory::new();
        let driver = factory.new_driver().unwrap();

        let mut writer = driver.open_for_write("/up.bin", false).await.unwrap();
        writer.write_all(b"abc").await.unwrap();
        assert!(factory.file_contents("/up.bin").is_none());
        writer.shutdown().await.unwrap();
        assert_eq!(factory.file_contents("/up.bin").unwrap(), b"abc");

        let mut writer = driver.open_for_write("/up.bin", true).await.unwrap();
        writer.write_all(b"def").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut reader = driver.open_for_read("/up.bin").await.unwrap();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await.unwrap();
        assert_eq!(data, b"abcdef");
    }

    #[tokio::test]
    async fn test_directories() {
        let factory = MemoryDriverFactory::new();
        let mut driver = factory.new_driver().unwrap();

        assert!(driver.make_dir("/pub").await);
        assert!(!driver.make_dir("/pub").await);
        assert!(!driver.make_dir("/missing/child").await);
        assert!(driver.change_dir("/pub").await);
        assert_eq!(driver.current_dir(), "/pub");

        factory.add_file("/pub/readme", b"hi", Utc::now());
        let entries = driver.list_entries("/").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir());
        assert_eq!(driver.list_entries("/pub").await.unwrap()[0].size(), 2);

        assert!(!driver.remove_dir("/pub").await);
        assert!(driver.delete_file("/pub/readme").await);
        assert!(driver.remove_dir("/pub").await);
        assert!(!driver.remove_dir("/").await);
    }

    #[tokio::test]
    async fn test_authenticate_and_rename() {
        let factory = MemoryDriverFactory::new().with_user("bob", "secret");
        let mut driver = factory.new_driver().unwrap();
        assert!(driver.authenticate("bob", "secret").await);
        assert!(!driver.authenticate("bob", "guess").await);

        factory.add_file("/a", b"1", Utc::now());
        factory.add_file("/b", b"2", Utc::now());
        assert!(!driver.rename("/a", "/b").await);
        assert!(driver.rename("/a", "/c").await);
        assert!(factory.file_contents("/a").is_none());
        assert_eq!(factory.file_contents("/c").unwrap(), b"1");
    }
}
