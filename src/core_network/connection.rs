use crate::constants::MAX_COMMAND_LINE_LENGTH;
use crate::core_tls::{TlsContext, TlsError};
use log::{debug, warn};
use std::io;
use std::net::SocketAddr;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

/// Anything the control channel can run over: a plain socket, a TLS stream
/// wrapping one, or an in-memory duplex in tests.
pub trait ControlStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ControlStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Line-oriented control connection.
///
/// The underlying stream sits behind a single boxed handle so AUTH TLS can
/// swap it for an encrypted one without the rest of the worker noticing.
pub struct FtpConnection {
    stream: Option<BufReader<Box<dyn ControlStream>>>,
    peer_addr: SocketAddr,
    tls: Option<TlsContext>,
    encrypted: bool,
}

impl std::fmt::Debug for FtpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpConnection")
            .field("peer_addr", &self.peer_addr)
            .field("encrypted", &self.encrypted)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl FtpConnection {
    pub fn new<S>(stream: S, peer_addr: SocketAddr, tls: Option<TlsContext>, encrypted: bool) -> Self
    where
        S: ControlStream + 'static,
    {
        Self {
            stream: Some(BufReader::new(Box::new(stream))),
            peer_addr,
            tls,
            encrypted,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Reads one command line without its terminator.
    ///
    /// Returns `Ok(None)` once the peer has hung up or the connection was closed
    /// locally. Bytes that are not valid UTF-8 are replaced, not rejected.
    /// A line longer than `MAX_COMMAND_LINE_LENGTH` is an `InvalidData` error.
    pub async fn read_command(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.stream.as_mut() else {
            return Ok(None);
        };

        let mut buffer = Vec::new();
        let mut limited = reader.take(MAX_COMMAND_LINE_LENGTH as u64);
        let n = limited.read_until(b'\n', &mut buffer).await?;
        if n == 0 {
            return Ok(None);
        }
        if n == MAX_COMMAND_LINE_LENGTH && !buffer.ends_with(b"\n") {
            warn!("Command line from {} exceeds {} bytes", self.peer_addr, n);
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "command line too long",
            ));
        }

        let line = String::from_utf8_lossy(&buffer);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Writes one reply followed by CRLF and flushes it. A closed connection
    /// swallows the reply.
    pub async fn send_response(&mut self, response: &str) -> io::Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            debug!("Dropping reply on closed connection: {}", response);
            return Ok(());
        };

        let writer = stream.get_mut();
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        writer.flush().await
    }

    /// Shuts the control stream down. Closing twice is a no-op.
    pub async fn close(&mut self) -> io::Result<()> {
        match self.stream.take() {
            Some(mut stream) => stream.get_mut().shutdown().await,
            None => Ok(()),
        }
    }

    /// Checks that AUTH TLS could proceed, without touching the stream.
    pub fn check_tls_upgrade(&self) -> Result<&TlsContext, TlsError> {
        if self.encrypted {
            return Err(TlsError::AlreadyEncrypted);
        }
        self.tls.as_ref().ok_or(TlsError::TlsNotConfigured)
    }

    /// Runs the TLS handshake over the current socket and continues the line
    /// protocol on the encrypted stream.
    ///
    /// A failed handshake leaves the connection closed: the plaintext stream
    /// has been consumed by then.
    pub async fn upgrade_to_tls(&mut self) -> Result<(), TlsError> {
        let tls = self.check_tls_upgrade()?.clone();
        let reader = self.stream.take().ok_or_else(|| {
            TlsError::TlsHandshakeError("control connection already closed".to_string())
        })?;

        if !reader.buffer().is_empty() {
            // Plaintext pipelined after AUTH must not be replayed as if it had been encrypted
            warn!(
                "Discarding {} plaintext byte(s) from {} received before the TLS handshake",
                reader.buffer().len(),
                self.peer_addr
            );
        }

        let tls_stream = tls.accept(reader.into_inner()).await?;
        self.stream = Some(BufReader::new(Box::new(tls_stream)));
        self.encrypted = true;
        debug!("Control connection from {} upgraded to TLS", self.peer_addr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt};

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_read_command_strips_terminators() {
        let (mut client, server) = duplex(1024);
        let mut conn = FtpConnection::new(server, peer(), None, false);

        client.write_all(b"USER test\r\nPWD\n").await.unwrap();
        assert_eq!(conn.read_command().await.unwrap().as_deref(), Some("USER test"));
        assert_eq!(conn.read_command().await.unwrap().as_deref(), Some("PWD"));

        drop(client);
        assert_eq!(conn.read_command().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overlong_command_line_is_rejected() {
        let (mut client, server) = duplex(8 * 1024);
        let mut conn = FtpConnection::new(server, peer(), None, false);

        // No terminator ever arrives
        client.write_all(&[b'A'; 5000]).await.unwrap();
        let err = conn.read_command().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_send_response_appends_crlf() {
        let (mut client, server) = duplex(1024);
        let mut conn = FtpConnection::new(server, peer(), None, false);

        conn.send_response("220 Hello").await.unwrap();
        let mut buf = [0u8; 11];
        client.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"220 Hello\r\n");
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (_client, server) = duplex(64);
        let mut conn = FtpConnection::new(server, peer(), None, false);

        conn.close().await.unwrap();
        assert!(conn.is_closed());
        conn.close().await.unwrap();
        assert_eq!(conn.read_command().await.unwrap(), None);
        conn.send_response("221 Goodbye").await.unwrap();
    }

    #[tokio::test]
    async fn test_upgrade_without_tls_context_fails_safely() {
        let (_client, server) = duplex(64);
        let mut conn = FtpConnection::new(server, peer(), None, false);

        assert!(matches!(
            conn.upgrade_to_tls().await,
            Err(TlsError::TlsNotConfigured)
        ));
        assert!(!conn.is_closed());
    }

    #[tokio::test]
    async fn test_upgrade_when_already_encrypted_fails_safely() {
        let (_client, server) = duplex(64);
        let mut conn = FtpConnection::new(server, peer(), None, true);

        assert!(matches!(
            conn.check_tls_upgrade(),
            Err(TlsError::AlreadyEncrypted)
        ));
        assert!(!conn.is_closed());
    }
}
