use crate::constants::{
    DATA_SOCKET_RETRIES, DATA_SOCKET_RETRY_DELAY_MS, DEFAULT_LISTEN_ADDRESS, DEFAULT_LISTEN_PORT,
    DEFAULT_SERVER_NAME,
};
use crate::core_network::data_channel::RetryPolicy;
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Sent to clients in the 220 greeting.
    pub server_name: String,
    pub listen_address: String,
    pub listen_port: u16,
    /// Inclusive passive port range. Both 0 means any free port.
    pub pasv_min_port: u16,
    pub pasv_max_port: u16,
    /// Public IP to advertise in PASV replies, for servers behind NAT.
    pub pasv_address: Option<String>,
    pub data_socket_retries: u32,
    pub data_socket_retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root_dir: PathBuf,
    pub passwd_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: String::from(DEFAULT_SERVER_NAME),
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            listen_port: DEFAULT_LISTEN_PORT,
            pasv_min_port: 0,
            pasv_max_port: 0,
            pasv_address: None,
            data_socket_retries: DATA_SOCKET_RETRIES,
            data_socket_retry_delay_ms: DATA_SOCKET_RETRY_DELAY_MS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("/var/ftp"),
            passwd_file: PathBuf::from("/etc/ferroftpd.passwd"),
        }
    }
}

impl ServerConfig {
    /// Address string suitable for binding, bracketing IPv6 hosts.
    pub fn listen_addr(&self) -> String {
        build_tcp_string(&self.listen_address, self.listen_port)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.data_socket_retries,
            base_delay: Duration::from_millis(self.data_socket_retry_delay_ms),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }
}

pub fn build_tcp_string(hostname: &str, port: u16) -> String {
    if hostname.contains(':') {
        format!("[{}]:{}", hostname, port)
    } else {
        format!("{}:{}", hostname, port)
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Server Name: {}", config.server.server_name);
    info!("  Listen Address: {}", config.server.listen_addr());
    info!(
        "  PASV Port Range: {}-{}",
        config.server.pasv_min_port, config.server.pasv_max_port
    );
    info!(
        "  PASV Address: {}",
        config.server.pasv_address.as_deref().unwrap_or("(local)")
    );
    info!("  Root Directory: {}", config.storage.root_dir.display());
    info!("  Passwd File: {}", config.storage.passwd_file.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_port = 2100
            pasv_min_port = 60200
            pasv_max_port = 60300
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_port, 2100);
        assert_eq!(config.server.pasv_min_port, 60200);
        assert_eq!(config.server.pasv_max_port, 60300);
        assert_eq!(config.server.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(config.server.data_socket_retries, DATA_SOCKET_RETRIES);
        assert!(config.server.pasv_address.is_none());
        assert_eq!(config.storage.root_dir, PathBuf::from("/var/ftp"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::from_toml("[server]\nlisten_port = \"abc\"").is_err());
    }

    #[test]
    fn test_listen_addr_brackets_ipv6() {
        assert_eq!(build_tcp_string("::", 21), "[::]:21");
        assert_eq!(build_tcp_string("127.0.0.1", 2121), "127.0.0.1:2121");
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = ServerConfig {
            data_socket_retries: 2,
            data_socket_retry_delay_ms: 15,
            ..ServerConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.attempts, 2);
        assert_eq!(policy.base_delay, Duration::from_millis(15));
    }
}
