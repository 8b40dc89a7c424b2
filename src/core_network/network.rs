use crate::config::ServerConfig;
use crate::core_driver::FtpDriverFactory;
use crate::core_ftpcommand::handlers::{initialize_command_handlers, CommandTable};
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Accepts control connections and runs one [`Session`] task per client.
///
/// The command table is built once and shared by every session. Each
/// session gets its own driver from the factory.
pub struct FtpServer {
    config: Arc<ServerConfig>,
    factory: Arc<dyn FtpDriverFactory>,
    commands: Arc<CommandTable>,
    shutdown: watch::Sender<bool>,
}

impl FtpServer {
    pub fn new(config: ServerConfig, factory: impl FtpDriverFactory + 'static) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config: Arc::new(config),
            factory: Arc::new(factory),
            commands: Arc::new(initialize_command_handlers()),
            shutdown,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured listen address and serves until [`FtpServer::close`].
    pub async fn listen_and_serve(&self) -> Result<()> {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Server listening on {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Runs the accept loop on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let mut shutdown = self.shutdown.subscribe();
        while !*shutdown.borrow_and_update() {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => self.spawn_session(socket, peer),
                    Err(e) => warn!("Failed to accept connection: {}", e),
                },
            }
        }
        info!("Server stopped accepting connections");
        Ok(())
    }

    /// Stops the accept loop. Sessions already running are left to finish.
    pub fn close(&self) {
        if !self.shutdown.send_replace(true) {
            debug!("Server shutdown requested");
        }
    }

    fn spawn_session(&self, socket: TcpStream, peer: SocketAddr) {
        let driver = match self.factory.new_driver() {
            Ok(driver) => driver,
            Err(e) => {
                error!("Failed to create driver for {}: {}", peer, e);
                return;
            }
        };
        let local_ip = match socket.local_addr() {
            Ok(addr) => addr.ip(),
            Err(e) => {
                warn!("Dropping connection from {}: {}", peer, e);
                return;
            }
        };

        let (reader, writer) = socket.into_split();
        let session = Session::new(
            writer,
            local_ip,
            driver,
            Arc::clone(&self.commands),
            Arc::clone(&self.config),
        );
        let session_id = session.session_id().to_string();
        info!("New connection from {} (session {})", peer, session_id);

        let handle = tokio::spawn(session.serve(BufReader::new(reader)));
        tokio::spawn(async move {
            match handle.await {
                Ok(()) => info!("Connection closed for {} (session {})", peer, session_id),
                Err(e) if e.is_panic() => error!("Session {} panicked: {}", session_id, e),
                Err(e) => warn!("Session {} was cancelled: {}", session_id, e),
            }
        });
    }
}
