// Storage driver errors
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid user record: {0}")]
    InvalidUser(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DriverError {
    /// Maps an I/O error on `path` to the closest driver error.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DriverError::NotFound(path.to_string()),
            io::ErrorKind::PermissionDenied => DriverError::PermissionDenied(path.to_string()),
            _ => DriverError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_kinds() {
        let err = DriverError::from_io("/a", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, DriverError::NotFound(ref p) if p == "/a"));

        let err = DriverError::from_io("/b", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, DriverError::PermissionDenied(_)));

        let err = DriverError::from_io("/c", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, DriverError::Io(_)));
    }
}
