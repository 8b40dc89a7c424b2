// Data channel errors
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("Unable to find available port to listen on")]
    NoAvailablePort,

    #[error("data socket unavailable")]
    Unavailable,

    #[error("Failed to bind passive listener: {0}")]
    Bind(#[source] io::Error),

    #[error("Failed to connect to client: {0}")]
    Connect(#[source] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported network protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        assert_eq!(
            DataChannelError::Unavailable.to_string(),
            "data socket unavailable"
        );
    }
}
