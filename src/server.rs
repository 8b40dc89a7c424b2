use crate::core_driver::fs_driver::FsDriverFactory;
use crate::core_network::network::FtpServer;
use crate::Config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration until Ctrl-C.
///
/// Files are served from `storage.root_dir` and users are authenticated
/// against `storage.passwd_file`.
pub async fn run(config: Config) -> Result<()> {
    let factory = FsDriverFactory::from_config(&config.storage)?;
    let server = Arc::new(FtpServer::new(config.server, factory));

    let signal_server = Arc::clone(&server);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal_server.close();
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    match server.listen_and_serve().await {
        Ok(()) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
