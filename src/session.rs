use crate::config::ServerConfig;
use crate::constants::{MAX_COMMAND_LINE, SESSION_ID_BYTES};
use crate::core_driver::FtpDriver;
use crate::core_fs;
use crate::core_ftpcommand::handlers::CommandTable;
use crate::core_log::FtpLogger;
use crate::core_network::data_channel::{unmap_ip, ActiveChannel, DataChannel, PassiveChannel};
use crate::core_network::error::DataChannelError;
use rand::RngCore;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter,
};

type ControlWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One read from the control connection.
#[derive(Debug, PartialEq)]
enum ControlLine {
    Command(String),
    /// The line exceeded `MAX_COMMAND_LINE` and was discarded.
    TooLong,
    Eof,
}

/// State of one control connection.
///
/// A session reads one command line at a time, checks the handler's
/// preconditions and lets the handler reply. It owns at most one data
/// channel; opening a new one closes the previous one.
pub struct Session {
    pub(crate) session_id: String,
    /// Current directory as seen by the client.
    pub(crate) name_prefix: String,
    /// Empty until PASS succeeds.
    pub(crate) user: String,
    pub(crate) req_user: Option<String>,
    pub(crate) rename_from: Option<String>,
    pub(crate) local_ip: IpAddr,
    pub(crate) driver: Box<dyn FtpDriver>,
    pub(crate) data_channel: Option<DataChannel>,
    pub(crate) logger: FtpLogger,
    pub(crate) closing: bool,
    config: Arc<ServerConfig>,
    commands: Arc<CommandTable>,
    writer: BufWriter<ControlWriter>,
}

impl Session {
    pub fn new<W>(
        writer: W,
        local_ip: IpAddr,
        driver: Box<dyn FtpDriver>,
        commands: Arc<CommandTable>,
        config: Arc<ServerConfig>,
    ) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let session_id = new_session_id();
        Self {
            logger: FtpLogger::new(session_id.clone()),
            session_id,
            name_prefix: String::from("/"),
            user: String::new(),
            req_user: None,
            rename_from: None,
            local_ip,
            driver,
            data_channel: None,
            closing: false,
            config,
            commands,
            writer: BufWriter::new(Box::new(writer)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_logged_in(&self) -> bool {
        !self.user.is_empty()
    }

    /// Greets the client and processes commands until the client quits,
    /// disconnects, or the control connection fails.
    pub async fn serve<R>(mut self, mut reader: R)
    where
        R: AsyncBufRead + Unpin,
    {
        self.logger.print("Connection established");
        let greeting = self.config.server_name.clone();
        if let Err(e) = self.write_message(220, &greeting).await {
            self.logger.warn(&format!("Failed to send greeting: {}", e));
            self.close().await;
            return;
        }

        while !self.closing {
            let result = match receive_line(&mut reader).await {
                Ok(ControlLine::Command(line)) => self.handle_line(&line).await,
                Ok(ControlLine::TooLong) => {
                    self.logger.warn("Discarded an oversized command line");
                    self.write_message(500, "Command line too long").await
                }
                Ok(ControlLine::Eof) => {
                    self.logger.print("Client disconnected");
                    break;
                }
                Err(e) => {
                    self.logger.warn(&format!("Failed to read command: {}", e));
                    break;
                }
            };
            if let Err(e) = result {
                self.logger.warn(&format!("Control connection failed: {}", e));
                break;
            }
        }
        self.close().await;
    }

    /// Dispatches one command line.
    pub(crate) async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        let (verb, param) = parse_line(line);
        self.logger.print_command(&verb, param);

        let Some(handler) = self.commands.get(verb.as_str()).cloned() else {
            return self.write_message(500, "Command not found").await;
        };
        if handler.require_param() && param.is_empty() {
            return self
                .write_message(553, "action aborted, required param missing")
                .await;
        }
        if handler.require_auth() && !self.is_logged_in() {
            return self.write_message(530, "not logged in").await;
        }
        handler.execute(self, param).await
    }

    /// Sends `<code> <message>\r\n` on the control connection.
    pub(crate) async fn write_message(&mut self, code: u16, message: &str) -> io::Result<()> {
        self.logger.print_response(code, message);
        let line = format!("{} {}\r\n", code, message);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await
    }

    /// Resolves a client supplied path against the current directory.
    pub(crate) fn build_path(&self, raw: &str) -> String {
        core_fs::build_path(&self.name_prefix, raw)
    }

    /// The address advertised in PASV replies: the configured public
    /// address, or the local end of the control connection.
    pub(crate) fn passive_host(&self) -> IpAddr {
        if let Some(address) = &self.config.pasv_address {
            match address.parse::<IpAddr>() {
                Ok(ip) => return unmap_ip(ip),
                Err(_) => self
                    .logger
                    .warn(&format!("Ignoring invalid pasv_address: {}", address)),
            }
        }
        unmap_ip(self.local_ip)
    }

    /// Replaces the data channel with a new passive one and returns its port.
    pub(crate) async fn new_passive_channel(&mut self) -> Result<u16, DataChannelError> {
        self.close_data_channel().await;
        let channel = PassiveChannel::listen(
            unmap_ip(self.local_ip),
            self.passive_host(),
            self.config.pasv_min_port,
            self.config.pasv_max_port,
            self.config.retry_policy(),
        )
        .await?;
        let channel = DataChannel::Passive(channel);
        let port = channel.port();
        self.logger
            .print(&format!("Passive data channel listening on port {}", port));
        self.data_channel = Some(channel);
        Ok(port)
    }

    /// Replaces the data channel with one connected to `addr`.
    pub(crate) async fn new_active_channel(
        &mut self,
        addr: SocketAddr,
    ) -> Result<u16, DataChannelError> {
        self.close_data_channel().await;
        let channel = DataChannel::Active(ActiveChannel::connect(addr).await?);
        self.logger
            .print(&format!("Active data channel connected to {}", addr));
        self.data_channel = Some(channel);
        Ok(addr.port())
    }

    pub(crate) fn has_data_channel(&self) -> bool {
        self.data_channel.is_some()
    }

    /// Replies 425 and returns false when no data channel was negotiated.
    pub(crate) async fn require_data_channel(&mut self) -> io::Result<bool> {
        if self.has_data_channel() {
            return Ok(true);
        }
        self.write_message(425, "Use PASV or PORT first.").await?;
        Ok(false)
    }

    pub(crate) async fn close_data_channel(&mut self) {
        if let Some(channel) = self.data_channel.take() {
            channel.close().await;
        }
    }

    /// Streams `reader` to the client over the data channel, closes the
    /// channel and reports the outcome on the control connection.
    pub(crate) async fn send_out_of_band<R>(&mut self, reader: &mut R) -> io::Result<()>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let Some(mut channel) = self.data_channel.take() else {
            return self.write_message(425, "Use PASV or PORT first.").await;
        };
        let result = channel.send_from(reader).await;
        channel.close().await;
        match result {
            Ok(bytes) => {
                self.logger.print(&format!("Sent {} bytes", bytes));
                self.write_message(226, "Transfer complete.").await
            }
            Err(e) => {
                self.logger.warn(&format!("Data transfer failed: {}", e));
                self.write_message(550, "Action not taken").await
            }
        }
    }

    /// Receives an upload over the data channel into `writer`, closes the
    /// channel and reports the outcome on the control connection.
    pub(crate) async fn receive_out_of_band<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let Some(mut channel) = self.data_channel.take() else {
            return self.write_message(425, "Use PASV or PORT first.").await;
        };
        let result = channel.receive_into(writer).await;
        channel.close().await;
        match result {
            Ok(bytes) => {
                self.logger.print(&format!("Received {} bytes", bytes));
                self.write_message(226, "Transfer complete.").await
            }
            Err(e) => {
                self.logger.warn(&format!("Data transfer failed: {}", e));
                self.write_message(550, "Action not taken").await
            }
        }
    }

    async fn close(&mut self) {
        self.close_data_channel().await;
        if let Err(e) = self.writer.shutdown().await {
            self.logger
                .print(&format!("Control connection shutdown: {}", e));
        }
        self.logger.print("Connection terminated");
    }
}

/// Reads one command line without its line terminator. At most
/// `MAX_COMMAND_LINE` bytes are buffered; the rest of a longer line is
/// skipped up to its terminator.
async fn receive_line<R>(reader: &mut R) -> io::Result<ControlLine>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = read_capped(reader, &mut buf).await?;
    if read == 0 {
        return Ok(ControlLine::Eof);
    }
    if buf.ends_with(b"\n") || (read as u64) < MAX_COMMAND_LINE {
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        return Ok(ControlLine::Command(line));
    }

    loop {
        buf.clear();
        if read_capped(reader, &mut buf).await? == 0 {
            return Ok(ControlLine::Eof);
        }
        if buf.ends_with(b"\n") {
            return Ok(ControlLine::TooLong);
        }
    }
}

async fn read_capped<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    (&mut *reader)
        .take(MAX_COMMAND_LINE)
        .read_until(b'\n', buf)
        .await
}

/// Splits a command line into an uppercased verb and its trimmed argument.
pub fn parse_line(line: &str) -> (String, &str) {
    let mut parts = line.splitn(2, ' ');
    let verb = parts.next().unwrap_or_default().to_ascii_uppercase();
    let param = parts.next().unwrap_or_default().trim();
    (verb, param)
}

fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
