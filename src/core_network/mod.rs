// Data channel negotiation and the control connection listener
pub mod data_channel;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

pub use data_channel::{DataChannel, RetryPolicy};
pub use error::DataChannelError;
