pub mod logger;

pub use logger::FtpLogger;
