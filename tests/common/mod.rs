#![allow(dead_code)]

use rouillepasv::config::{StorageBackend, UserEntry};
use rouillepasv::{Config, Server, ServerStatus};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Loopback configuration with the in-memory backend and a `test`/`1234` user.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.listen_address = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.server.listen_port = 0;
    config.server.data_timeout = 5;
    config.storage.backend = StorageBackend::Memory;
    config.auth.users.push(UserEntry {
        username: "test".to_string(),
        password: "1234".to_string(),
    });
    config
}

pub async fn start_server(config: Config) -> (Server, SocketAddr) {
    let server = Server::from_config(config).await.unwrap();
    assert_eq!(server.start().await.unwrap(), ServerStatus::Started);
    let addr = server.local_addr().await.unwrap();
    (server, addr)
}

/// Minimal line-oriented FTP client.
pub struct Client<S> {
    reader: BufReader<S>,
}

impl Client<TcpStream> {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self::new(stream)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    pub fn into_inner(self) -> S {
        assert!(self.reader.buffer().is_empty());
        self.reader.into_inner()
    }

    pub async fn read_reply(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line.trim_end().to_string()
    }

    /// Reads a possibly multi-line reply, returning the final line.
    pub async fn read_final_reply(&mut self) -> String {
        loop {
            let line = self.read_reply().await;
            let bytes = line.as_bytes();
            if line.is_empty() || (bytes.len() >= 4 && bytes[3] == b' ') {
                return line;
            }
        }
    }

    pub async fn send(&mut self, line: &str) {
        let stream = self.reader.get_mut();
        stream.write_all(line.as_bytes()).await.unwrap();
        stream.write_all(b"\r\n").await.unwrap();
        stream.flush().await.unwrap();
    }

    pub async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_final_reply().await
    }

    pub async fn login(&mut self) {
        assert_eq!(self.command("USER test").await, "331 Password required");
        assert_eq!(self.command("PASS 1234").await, "230 User logged in.");
    }

    /// Issues PASV and returns the advertised data address.
    pub async fn pasv(&mut self) -> SocketAddr {
        let reply = self.command("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        parse_pasv_reply(&reply)
    }
}

pub fn parse_pasv_reply(reply: &str) -> SocketAddr {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.find(')').unwrap();
    let numbers: Vec<u8> = reply[start..end]
        .split(',')
        .map(|n| n.trim().parse().unwrap())
        .collect();
    let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = u16::from(numbers[4]) * 256 + u16::from(numbers[5]);
    SocketAddr::new(IpAddr::V4(ip), port)
}
