#[allow(clippy::module_inception)]
pub mod core_cli;

pub use core_cli::{Cli, CliCommand};
