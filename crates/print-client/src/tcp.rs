//! TCP transport for ZPL printers (port 9100 / JetDirect / RAW).
//!
//! Provides [`TcpPrinter`], a synchronous TCP transport implementing
//! [`Printer`]. Data is written verbatim with no framing and nothing is
//! read back.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::{PrintError, Printer};

/// A synchronous TCP connection to a ZPL printer.
pub struct TcpPrinter {
    stream: TcpStream,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Connect to a printer at `addr`.
    ///
    /// Configures the socket with TCP_NODELAY, TCP keepalive (60s interval),
    /// and the given write timeout.
    pub fn connect(
        addr: SocketAddr,
        connect_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Self, PrintError> {
        let stream = open_stream(&addr, connect_timeout)?;
        configure_stream(&stream, &addr, write_timeout)?;
        Ok(Self { stream, addr })
    }

    /// Return the socket address this printer is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Check TCP reachability: connect, then close immediately.
///
/// Success says nothing about whether the printer is ready to print.
pub fn probe(addr: SocketAddr, timeout: Duration) -> Result<(), PrintError> {
    let stream = open_stream(&addr, timeout)?;
    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream
            .write_all(data)
            .map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)?;
        Ok(())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Open a TCP connection, classifying the failure.
fn open_stream(addr: &SocketAddr, timeout: Duration) -> Result<TcpStream, PrintError> {
    TcpStream::connect_timeout(addr, timeout).map_err(|e| connect_error(addr, timeout, e))
}

/// Map a failed connect to refused, timed out, or a generic failure.
///
/// `WouldBlock` counts as a timeout: some platforms report an expired
/// non-blocking connect that way.
fn connect_error(addr: &SocketAddr, timeout: Duration, e: io::Error) -> PrintError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
            addr: addr.to_string(),
            source: e,
        },
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => PrintError::ConnectionTimeout {
            addr: addr.to_string(),
            timeout,
            source: e,
        },
        _ => PrintError::ConnectionFailed {
            addr: addr.to_string(),
            source: e,
        },
    }
}

/// Configure TCP_NODELAY, keepalive, and the write timeout on a stream.
fn configure_stream(
    stream: &TcpStream,
    addr: &SocketAddr,
    write_timeout: Duration,
) -> Result<(), PrintError> {
    let failed = |e| PrintError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    };

    // Disable Nagle's algorithm; labels go out as soon as they are written.
    stream.set_nodelay(true).map_err(failed)?;
    configure_keepalive(stream, Duration::from_secs(60)).map_err(failed)?;
    stream
        .set_write_timeout(Some(write_timeout))
        .map_err(failed)?;
    Ok(())
}

/// Configure TCP keepalive on a `TcpStream` via `socket2`.
fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}
