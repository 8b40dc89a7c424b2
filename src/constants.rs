// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.-]{1,32}$";

pub const DEFAULT_SERVER_NAME: &str = "ferroftpd";
pub const DEFAULT_LISTEN_ADDRESS: &str = "::";
pub const DEFAULT_LISTEN_PORT: u16 = 2121;

/// Number of random ports tried before a PASV/EPSV gives up.
pub const PASV_BIND_ATTEMPTS: u32 = 100;

/// Passive data socket readiness: retries and base sleep between them.
pub const DATA_SOCKET_RETRIES: u32 = 4;
pub const DATA_SOCKET_RETRY_DELAY_MS: u64 = 500;

/// Entries modified within this many days show a time of day in LIST output.
pub const LISTING_RECENT_DAYS: i64 = 180;

pub const SESSION_ID_BYTES: usize = 10;

/// Longest command line accepted on the control connection, terminator included.
pub const MAX_COMMAND_LINE: u64 = 8192;
