use crate::core_ftpcommand::handlers::CommandHandler;
use crate::session::Session;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr};

/// Handles the PASV FTP command (IPv4 only).
pub struct Pasv;

/// Handles the EPSV FTP command (RFC 2428).
pub struct Epsv;

/// Formats the 227 reply text for `ip:port`.
pub fn pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{})",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xff
    )
}

#[async_trait]
impl CommandHandler for Pasv {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        let IpAddr::V4(host) = session.passive_host() else {
            session
                .logger
                .warn("PASV needs an IPv4 address to advertise, use EPSV");
            return session.write_message(425, "Data connection failed").await;
        };

        match session.new_passive_channel().await {
            Ok(port) => session.write_message(227, &pasv_reply(host, port)).await,
            Err(e) => {
                session.logger.warn(&format!("PASV failed: {}", e));
                session.write_message(425, "Data connection failed").await
            }
        }
    }
}

#[async_trait]
impl CommandHandler for Epsv {
    fn require_param(&self) -> bool {
        false
    }

    fn require_auth(&self) -> bool {
        true
    }

    async fn execute(&self, session: &mut Session, _param: &str) -> io::Result<()> {
        match session.new_passive_channel().await {
            Ok(port) => {
                let message = format!("Entering Extended Passive Mode (|||{}|)", port);
                session.write_message(229, &message).await
            }
            Err(e) => {
                session.logger.warn(&format!("EPSV failed: {}", e));
                session.write_message(425, "Data connection failed").await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pasv_reply() {
        assert_eq!(
            pasv_reply(Ipv4Addr::new(192, 168, 1, 10), 61234),
            "Entering Passive Mode (192,168,1,10,239,50)"
        );
        assert_eq!(
            pasv_reply(Ipv4Addr::LOCALHOST, 21),
            "Entering Passive Mode (127,0,0,1,0,21)"
        );
    }
}
