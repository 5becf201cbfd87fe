//! Transport provider interface
//!
//! The shell session drives any transport that can authenticate, open a
//! PTY-backed shell channel and hand out raw byte streams over it. The
//! production implementation is [`RusshConnector`](super::connection::RusshConnector).

use std::io;
use std::time::Duration;

use async_trait::async_trait;

use super::config::{PtySettings, SshConfig};
use crate::error::Result;

/// Opens sessions to remote hosts
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `config.host:config.port` and complete the handshake,
    /// applying `config.host_key_policy`, within `config.connect_timeout`.
    async fn open_session(&self, config: &SshConfig) -> Result<Box<dyn TransportSession>>;
}

/// An established, not yet authenticated, connection
#[async_trait]
pub trait TransportSession: Send {
    /// Password authentication
    async fn authenticate(&mut self, username: &str, password: &str, deadline: Duration)
        -> Result<()>;

    /// Open a session channel, request a PTY and start a shell on it
    async fn open_shell(
        &mut self,
        pty: &PtySettings,
        deadline: Duration,
    ) -> Result<Box<dyn ShellChannel>>;

    /// Tear the connection down
    async fn disconnect(&mut self) -> Result<()>;
}

/// Interactive shell channel
#[async_trait]
pub trait ShellChannel: Send {
    /// Whether the remote end still has the channel open
    fn is_connected(&self) -> bool;

    /// Stream of terminal output coming from the remote shell
    fn open_input(&mut self) -> io::Result<Box<dyn InputStream>>;

    /// Stream of keystrokes going to the remote shell
    fn open_output(&mut self) -> io::Result<Box<dyn OutputStream>>;

    /// Close the channel
    async fn close(&mut self) -> Result<()>;
}

/// Bytes arriving from the remote shell
#[async_trait]
pub trait InputStream: Send {
    /// Number of bytes that can be read right now without waiting
    async fn available(&mut self) -> io::Result<usize>;

    /// Read into `buf`; returns 0 at end of stream
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    async fn close(&mut self) -> io::Result<()>;
}

/// Bytes going to the remote shell
#[async_trait]
pub trait OutputStream: Send {
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    async fn flush(&mut self) -> io::Result<()>;

    async fn close(&mut self) -> io::Result<()>;
}
