//! The secondary TCP connection used for listings and file transfers.
//!
//! An active channel is connected as soon as it exists. A passive channel
//! owns a listener whose accept runs on its own task; the accepted stream
//! is handed over through a oneshot, and reads or writes issued before the
//! client connects wait with a bounded linear backoff.

use crate::constants::{DATA_SOCKET_RETRIES, DATA_SOCKET_RETRY_DELAY_MS, PASV_BIND_ATTEMPTS};
use crate::core_network::error::DataChannelError;
use log::{debug, trace, warn};
use rand::Rng;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// How long a passive channel waits for its peer. Before giving up it sleeps
/// `base_delay * 1`, `base_delay * 2`, ... up to `attempts` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DATA_SOCKET_RETRIES,
            base_delay: Duration::from_millis(DATA_SOCKET_RETRY_DELAY_MS),
        }
    }
}

#[derive(Debug)]
pub enum DataChannel {
    Active(ActiveChannel),
    Passive(PassiveChannel),
}

impl DataChannel {
    pub fn host(&self) -> IpAddr {
        match self {
            DataChannel::Active(channel) => channel.host,
            DataChannel::Passive(channel) => channel.host,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            DataChannel::Active(channel) => channel.port,
            DataChannel::Passive(channel) => channel.port,
        }
    }

    async fn stream(&mut self) -> Result<&mut TcpStream, DataChannelError> {
        match self {
            DataChannel::Active(channel) => Ok(&mut channel.stream),
            DataChannel::Passive(channel) => channel.wait_for_stream().await,
        }
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, DataChannelError> {
        let stream = self.stream().await?;
        Ok(stream.read(buf).await?)
    }

    pub async fn write_all(&mut self, data: &[u8]) -> Result<(), DataChannelError> {
        let stream = self.stream().await?;
        stream.write_all(data).await?;
        Ok(())
    }

    /// Copies `reader` to the peer until EOF.
    pub async fn send_from<R>(&mut self, reader: &mut R) -> Result<u64, DataChannelError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let stream = self.stream().await?;
        let bytes = tokio::io::copy(reader, stream).await?;
        stream.flush().await?;
        Ok(bytes)
    }

    /// Copies everything the peer sends into `writer`, then shuts the writer
    /// down so the upload is committed.
    pub async fn receive_into<W>(&mut self, writer: &mut W) -> Result<u64, DataChannelError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let stream = self.stream().await?;
        let bytes = tokio::io::copy(stream, writer).await?;
        writer.flush().await?;
        writer.shutdown().await?;
        Ok(bytes)
    }

    pub async fn close(self) {
        match self {
            DataChannel::Active(channel) => channel.close().await,
            DataChannel::Passive(channel) => channel.close().await,
        }
    }
}

#[derive(Debug)]
pub struct ActiveChannel {
    host: IpAddr,
    port: u16,
    stream: TcpStream,
}

impl ActiveChannel {
    pub async fn connect(addr: SocketAddr) -> Result<Self, DataChannelError> {
        debug!("Opening active data connection to {}", addr);
        let stream = TcpStream::connect(addr)
            .await
            .map_err(DataChannelError::Connect)?;
        Ok(Self {
            host: addr.ip(),
            port: addr.port(),
            stream,
        })
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            trace!("Active data connection shutdown: {}", e);
        }
    }
}

#[derive(Debug)]
pub struct PassiveChannel {
    host: IpAddr,
    port: u16,
    stream: Option<TcpStream>,
    receiver: oneshot::Receiver<TcpStream>,
    accept_task: JoinHandle<()>,
    retry: RetryPolicy,
}

impl PassiveChannel {
    /// Binds a listener on `bind_ip` within `[min_port, max_port]` and starts
    /// accepting in the background. `host` is the address reported to the
    /// client.
    pub async fn listen(
        bind_ip: IpAddr,
        host: IpAddr,
        min_port: u16,
        max_port: u16,
        retry: RetryPolicy,
    ) -> Result<Self, DataChannelError> {
        let listener = bind_in_range(bind_ip, min_port, max_port).await?;
        let port = listener.local_addr()?.port();
        debug!("Passive listener bound on {}:{}", bind_ip, port);

        let (sender, receiver) = oneshot::channel();
        let accept_task = tokio::spawn(accept_pasv_connection(listener, sender));

        Ok(Self {
            host,
            port,
            stream: None,
            receiver,
            accept_task,
            retry,
        })
    }

    async fn wait_for_stream(&mut self) -> Result<&mut TcpStream, DataChannelError> {
        let mut retries = 0;
        while self.stream.is_none() {
            match self.receiver.try_recv() {
                Ok(stream) => self.stream = Some(stream),
                Err(TryRecvError::Empty) if retries < self.retry.attempts => {
                    debug!("Sleeping, data socket isn't open yet");
                    sleep(self.retry.base_delay * (retries + 1)).await;
                    retries += 1;
                }
                Err(_) => return Err(DataChannelError::Unavailable),
            }
        }
        self.stream.as_mut().ok_or(DataChannelError::Unavailable)
    }

    async fn close(mut self) {
        debug!("Closing passive data socket on port {}", self.port);
        self.accept_task.abort();
        // Wait for the task so the listener is released before returning.
        let _ = (&mut self.accept_task).await;
        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.shutdown().await {
                trace!("Passive data connection shutdown: {}", e);
            }
        }
    }
}

impl Drop for PassiveChannel {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn accept_pasv_connection(listener: TcpListener, sender: oneshot::Sender<TcpStream>) {
    match listener.accept().await {
        Ok((stream, addr)) => {
            debug!("Accepted data connection from: {}", addr);
            if sender.send(stream).is_err() {
                trace!("Passive channel dropped before the connection was handed over");
            }
        }
        Err(e) => warn!("Failed to accept data connection: {}", e),
    }
}

/// Binds a listener on a random port of the inclusive range, or on any free
/// port when both bounds are 0. A range with only one bound set is invalid.
pub async fn bind_in_range(
    ip: IpAddr,
    min_port: u16,
    max_port: u16,
) -> Result<TcpListener, DataChannelError> {
    if min_port == 0 && max_port == 0 {
        return TcpListener::bind((ip, 0)).await.map_err(DataChannelError::Bind);
    }
    if min_port == 0 || min_port > max_port {
        return Err(DataChannelError::InvalidAddress(format!(
            "passive port range {}-{}",
            min_port, max_port
        )));
    }

    for _ in 0..PASV_BIND_ATTEMPTS {
        let port = rand::thread_rng().gen_range(min_port..=max_port);
        match TcpListener::bind((ip, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => trace!("Passive port {} unavailable: {}", port, e),
        }
    }
    Err(DataChannelError::NoAvailablePort)
}

/// Maps an IPv4-mapped IPv6 address back to IPv4.
pub fn unmap_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => ip,
        },
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Instant;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn fast_retry(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_unmap_ip() {
        let mapped: IpAddr = "::ffff:10.0.0.1".parse().unwrap();
        assert_eq!(unmap_ip(mapped), "10.0.0.1".parse::<IpAddr>().unwrap());
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(unmap_ip(v6), v6);
    }

    #[tokio::test]
    async fn test_bind_in_range_stays_in_range() {
        let listener = bind_in_range(LOCALHOST, 61400, 61420).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!((61400..=61420).contains(&port));
    }

    #[tokio::test]
    async fn test_bind_in_range_exhausted() {
        let taken = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let result = bind_in_range(LOCALHOST, port, port).await;
        assert!(matches!(result, Err(DataChannelError::NoAvailablePort)));
    }

    #[tokio::test]
    async fn test_bind_in_range_rejects_half_set_range() {
        for _ in 0..40 {
            let result = bind_in_range(LOCALHOST, 0, 3).await;
            assert!(matches!(result, Err(DataChannelError::InvalidAddress(_))));
        }
        let result = bind_in_range(LOCALHOST, 61430, 61420).await;
        assert!(matches!(result, Err(DataChannelError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_passive_channel_gives_up_after_retries() {
        let channel = PassiveChannel::listen(LOCALHOST, LOCALHOST, 0, 0, fast_retry(3))
            .await
            .unwrap();
        let mut channel = DataChannel::Passive(channel);

        let started = Instant::now();
        let result = channel.write_all(b"data").await;
        assert!(matches!(result, Err(DataChannelError::Unavailable)));
        // 10 + 20 + 30 ms of backoff.
        assert!(started.elapsed() >= Duration::from_millis(60));
        channel.close().await;
    }

    #[tokio::test]
    async fn test_passive_channel_transfers_after_connect() {
        let channel = PassiveChannel::listen(LOCALHOST, LOCALHOST, 0, 0, fast_retry(4))
            .await
            .unwrap();
        let mut channel = DataChannel::Passive(channel);
        let mut client = TcpStream::connect((LOCALHOST, channel.port())).await.unwrap();

        channel.write_all(b"hello").await.unwrap();
        channel.close().await;

        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"hello");
    }

    #[tokio::test]
    async fn test_closing_passive_channel_releases_port() {
        let channel = PassiveChannel::listen(LOCALHOST, LOCALHOST, 0, 0, fast_retry(1))
            .await
            .unwrap();
        let port = channel.port;
        DataChannel::Passive(channel).close().await;
        assert!(TcpListener::bind((LOCALHOST, port)).await.is_ok());
    }

    #[tokio::test]
    async fn test_active_channel_receive_into() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"uploaded").await.unwrap();
        });

        let mut channel = DataChannel::Active(ActiveChannel::connect(addr).await.unwrap());
        assert_eq!(channel.host(), LOCALHOST);
        assert_eq!(channel.port(), addr.port());
        client.await.unwrap();

        let mut sink: Vec<u8> = Vec::new();
        let bytes = channel.receive_into(&mut sink).await.unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(sink, b"uploaded");
        channel.close().await;
    }
}
