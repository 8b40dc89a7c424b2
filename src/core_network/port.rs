use crate::core_ftpcommand::handlers::CommandHandler;
use crate::core_network::error::DataChannelError;
use crate::session::Session;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Handles the PORT FTP command (active mode, IPv4).
pub struct Port;

/// Handles the EPRT FTP command (RFC 2428).
pub struct Eprt;

/// Parses `h1,h2,h3,h4,p1,p2`.
pub fn parse_port_arg(arg: &str) -> Result<SocketAddr, DataChannelError> {
    let invalid = || DataChannelError::InvalidAddress(arg.to_string());
    let parts = arg
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| invalid())?;
    let [h1, h2, h3, h4, p1, p2] = parts[..] else {
        return Err(invalid());
    };
    let ip = Ipv4Addr::new(h1, h2, h3, h4);
    let port = (u16::from(p1) << 8) | u16::from(p2);
    Ok(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Parses `<d><af><d><host><d><port><d>`, where `<d>` is any delimiter
/// character and `<af>` is 1 for IPv4 or 2 for IPv6.
pub fn parse_eprt_arg(arg: &str) -> Result<SocketAddr, DataChannelError> {
    let invalid = || DataChannelError::InvalidAddress(arg.to_string());
    let delimiter = arg.chars().next().ok_or_else(invalid)?;
    let fields: Vec<&str> = arg.split(delimiter).collect();
    let [_, family, host, port, _] = fields[..] else {
        return Err(invalid());
    };

    let port: u16 = port.parse().map_err(|_| invalid())?;
    let ip: IpAddr = match family {
        "1" => IpAddr::V4(host.parse().map_err(|_| invalid())?),
        "2" => IpAddr::V6(host.parse().map_err(|_| invalid())?),
        other => return Err(DataChannelError::UnsupportedProtocol(other.to_string())),
    };
    Ok(SocketAddr::new(ip, port))
}

async fn open_active(
    session: &mut Session,
    parsed: Result<SocketAddr, DataChannelError>,
) -> io::Result<()> {
    let addr = match parsed {
        Ok(addr) => addr,
        Err(DataChannelError::UnsupportedProtocol(family)) => {
            session
                .logger
                .print(&format!("Unsupported address family: {}", family));
            return session
                .write_message(522, "Network protocol not supported, use (1,2)")
                .await;
        }
        Err(_) => {
            return session
                .write_message(501, "Syntax error in parameters or arguments.")
                .await;
        }
    };

    match session.new_active_channel(addr).await {
        Ok(port) => {
            let message = format!("Connection established ({})", port);
            session.write_message(200, &message).await
        }
        Err(e) => {
            session
                .logger
                .warn(&format!("Failed to connect to client {}: {}", addr, e));
            session.write_message(425, "Data connection failed").await
        }
    }
}

#[async_trait]
impl CommandHandler for Port {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        open_active(session, parse_port_arg(param)).await
    }
}

#[async_trait]
impl CommandHandler for Eprt {
    fn require_param(&self) -> bool {
        true
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, param: &str) -> io::Result<()> {
        open_active(session, parse_eprt_arg(param)).await
    }
}
