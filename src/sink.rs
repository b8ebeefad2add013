//! Record output targets.
//!
//! [`Output`] dials one of the supported sinks from a scheme-prefixed
//! target (`file://path`, `tcp://host:port`, `udp://host:port`; empty
//! means stdout) and exposes them behind a single [`AsyncWrite`]
//! implementation so handlers never care which one they write to.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, Stdout};
use tokio::net::{TcpStream, UdpSocket};

const FILE_PREFIX: &str = "file://";
const TCP_PREFIX: &str = "tcp://";
const UDP_PREFIX: &str = "udp://";

/// A dialled record sink.
pub enum Output {
    Stdout(Stdout),
    File(File),
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Output {
    /// Dials the sink described by `target`.
    ///
    /// Files are opened in append mode and created when missing. UDP
    /// sinks are connected, so every write becomes one datagram. An
    /// unrecognized scheme is rejected.
    pub async fn dial(target: &str) -> io::Result<Self> {
        if target.is_empty() {
            return Ok(Output::Stdout(tokio::io::stdout()));
        }
        if let Some(path) = target.strip_prefix(FILE_PREFIX) {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            return Ok(Output::File(file));
        }
        if let Some(addr) = target.strip_prefix(TCP_PREFIX) {
            return Ok(Output::Tcp(TcpStream::connect(addr).await?));
        }
        if let Some(addr) = target.strip_prefix(UDP_PREFIX) {
            let socket = UdpSocket::bind("0.0.0.0:0").await?;
            socket.connect(addr).await?;
            return Ok(Output::Udp(socket));
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output invalid: {target}"),
        ))
    }
}

impl AsyncWrite for Output {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Output::Stdout(w) => Pin::new(w).poll_write(cx, buf),
            Output::File(w) => Pin::new(w).poll_write(cx, buf),
            Output::Tcp(w) => Pin::new(w).poll_write(cx, buf),
            Output::Udp(socket) => socket.poll_send(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Output::Stdout(w) => Pin::new(w).poll_flush(cx),
            Output::File(w) => Pin::new(w).poll_flush(cx),
            Output::Tcp(w) => Pin::new(w).poll_flush(cx),
            // datagrams leave on write
            Output::Udp(_) => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Output::Stdout(w) => Pin::new(w).poll_shutdown(cx),
            Output::File(w) => Pin::new(w).poll_shutdown(cx),
            Output::Tcp(w) => Pin::new(w).poll_shutdown(cx),
            Output::Udp(_) => Poll::Ready(Ok(())),
        }
    }
}
