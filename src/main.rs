use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use ferroftpd::config::log_config;
use ferroftpd::core_auth::hash_password;
use ferroftpd::core_cli::{Cli, CliCommand};
use ferroftpd::{server, Config};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/ferroftpd.conf";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    if let Some(CliCommand::HashPassword { password }) = &args.command {
        let hashed = hash_password(password).context("Failed to hash password")?;
        println!("{}", hashed);
        return Ok(());
    }

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::load_from_file(DEFAULT_CONFIG_PATH)?
        }
        None => {
            warn!(
                "No configuration file at {}, using defaults",
                DEFAULT_CONFIG_PATH
            );
            Config::default()
        }
    };

    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    info!("Starting ferroftpd with configuration:");
    log_config(&config);

    server::run(config).await
}
