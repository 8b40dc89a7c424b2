use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Symlink,
}

/// A read-only directory entry as reported by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    name: String,
    size: u64,
    kind: FileKind,
    modified: DateTime<Utc>,
}

impl FileInfo {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        kind: FileKind,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
            modified,
        }
    }

    /// An entry for a single directory, stamped with the current time. Use it
    /// to build the result of [`FtpDriver::list_entries`](super::FtpDriver::list_entries).
    pub fn new_dir_item(name: impl Into<String>) -> Self {
        Self::new(name, 0, FileKind::Directory, Utc::now())
    }

    /// An entry for a single regular file.
    pub fn new_file_item(name: impl Into<String>, bytes: u64, modtime: DateTime<Utc>) -> Self {
        Self::new(name, bytes, FileKind::File, modtime)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_dir_item() {
        let before = Utc::now();
        let dir = FileInfo::new_dir_item("dir");
        assert_eq!(dir.name(), "dir");
        assert_eq!(dir.size(), 0);
        assert!(dir.is_dir());
        assert!(dir.modified() >= before && dir.modified() <= Utc::now());
    }

    #[test]
    fn test_new_file_item() {
        let modtime = Utc.with_ymd_and_hms(2023, 7, 14, 9, 30, 0).unwrap();
        let file = FileInfo::new_file_item("test.txt", 99, modtime);
        assert_eq!(file.name(), "test.txt");
        assert_eq!(file.size(), 99);
        assert_eq!(file.kind(), FileKind::File);
        assert!(!file.is_dir());
        assert_eq!(file.modified(), modtime);
    }
}
