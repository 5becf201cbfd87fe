//! russh transport provider
//!
//! Connects over TCP, authenticates with a password, and opens a PTY-backed
//! shell channel. The channel's message queue is exposed as a pair of byte
//! streams: reads only see data russh has already queued, writes go straight
//! out as channel data.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{Channel, ChannelMsg, Disconnect};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::config::{PtySettings, SshConfig};
use super::handler::SshHandler;
use super::transport::{Connector, InputStream, OutputStream, ShellChannel, TransportSession};
use crate::error::{Result, ShellError};

/// Production [`Connector`] backed by russh
#[derive(Debug, Clone, Default)]
pub struct RusshConnector;

impl RusshConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for RusshConnector {
    async fn open_session(&self, config: &SshConfig) -> Result<Box<dyn TransportSession>> {
        info!("Connecting to SSH server {}...", config.address());

        let ssh_config = Arc::new(client::Config::default());
        let handler = SshHandler::new(config.host_key_policy.clone());
        let addr = config.address();

        let connect_result = timeout(
            config.connect_timeout,
            client::connect(ssh_config, addr.as_str(), handler),
        )
        .await;

        match connect_result {
            Ok(Ok(handle)) => Ok(Box::new(RusshSession { handle })),
            Ok(Err(e)) => {
                error!("SSH connection failed: {}", e);
                Err(ShellError::connect(e.to_string()))
            }
            Err(_) => {
                error!(
                    "SSH connection timeout after {}ms",
                    config.connect_timeout.as_millis()
                );
                Err(ShellError::connect(format!(
                    "Connection timeout after {}ms",
                    config.connect_timeout.as_millis()
                )))
            }
        }
    }
}

/// Authenticated or authenticating russh connection
struct RusshSession {
    handle: Handle<SshHandler>,
}

#[async_trait]
impl TransportSession for RusshSession {
    async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        deadline: Duration,
    ) -> Result<()> {
        debug!("Attempting password authentication for user '{}'", username);

        let auth_result = timeout(deadline, self.handle.authenticate_password(username, password))
            .await
            .map_err(|_| ShellError::connect("Authentication timed out"))?
            .map_err(|e| ShellError::connect(e.to_string()))?;

        if auth_result.success() {
            info!("Password authentication successful");
            Ok(())
        } else {
            Err(ShellError::connect("Auth fail"))
        }
    }

    async fn open_shell(
        &mut self,
        pty: &PtySettings,
        deadline: Duration,
    ) -> Result<Box<dyn ShellChannel>> {
        let channel = timeout(deadline, self.handle.channel_open_session())
            .await
            .map_err(|_| ShellError::connect("Opening channel timed out"))?
            .map_err(|e| ShellError::connect(format!("Failed to open channel: {}", e)))?;

        debug!("Opened channel, requesting PTY");

        timeout(
            deadline,
            channel.request_pty(
                true,
                &pty.term,
                pty.cols,
                pty.rows,
                pty.pixel_width,
                pty.pixel_height,
                &[],
            ),
        )
        .await
        .map_err(|_| ShellError::connect("PTY request timed out"))?
        .map_err(|e| ShellError::connect(format!("Failed to request PTY: {}", e)))?;

        timeout(deadline, channel.request_shell(true))
            .await
            .map_err(|_| ShellError::connect("Shell request timed out"))?
            .map_err(|e| ShellError::connect(format!("Failed to request shell: {}", e)))?;

        debug!("Shell started on {}x{} {} terminal", pty.cols, pty.rows, pty.term);

        Ok(Box::new(RusshShell {
            shared: Arc::new(SharedChannel {
                channel: Mutex::new(channel),
                connected: AtomicBool::new(true),
            }),
        }))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "")
            .await
            .map_err(|e| ShellError::connect(e.to_string()))
    }
}

/// Channel state shared by the shell and its two streams
struct SharedChannel {
    channel: Mutex<Channel<client::Msg>>,
    connected: AtomicBool,
}

struct RusshShell {
    shared: Arc<SharedChannel>,
}

#[async_trait]
impl ShellChannel for RusshShell {
    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn open_input(&mut self) -> io::Result<Box<dyn InputStream>> {
        Ok(Box::new(ChannelInput {
            shared: Arc::clone(&self.shared),
            buffer: InputBuffer::default(),
        }))
    }

    fn open_output(&mut self) -> io::Result<Box<dyn OutputStream>> {
        Ok(Box::new(ChannelOutput {
            shared: Arc::clone(&self.shared),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        self.shared.connected.store(false, Ordering::SeqCst);
        let channel = self.shared.channel.lock().await;
        channel
            .close()
            .await
            .map_err(|e| ShellError::connect(e.to_string()))
    }
}

/// Bytes received on the shell channel and not yet read
#[derive(Debug, Default)]
struct InputBuffer {
    pending: Vec<u8>,
    eof: bool,
    closed: bool,
}

impl InputBuffer {
    /// Apply one channel message; returns false once the stream has ended
    fn accept(&mut self, msg: Option<&ChannelMsg>) -> bool {
        match msg {
            Some(ChannelMsg::Data { data }) => {
                self.pending.extend_from_slice(data);
            }
            // A PTY merges stderr into the terminal stream
            Some(ChannelMsg::ExtendedData { data, .. }) => {
                self.pending.extend_from_slice(data);
            }
            Some(ChannelMsg::Eof) => {
                self.eof = true;
            }
            Some(ChannelMsg::Close) | None => {
                self.eof = true;
                self.closed = true;
            }
            Some(_) => {}
        }
        !self.eof
    }

    fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether a blocking read has to wait for another message
    fn starved(&self) -> bool {
        self.pending.is_empty() && !self.eof
    }

    fn take(&mut self, buf: &mut [u8]) -> usize {
        let len = buf.len().min(self.pending.len());
        buf[..len].copy_from_slice(&self.pending[..len]);
        self.pending.drain(..len);
        len
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.eof = true;
    }
}

/// Terminal output read from the channel's message queue
struct ChannelInput {
    shared: Arc<SharedChannel>,
    buffer: InputBuffer,
}

impl ChannelInput {
    fn accept(&mut self, msg: Option<ChannelMsg>) -> bool {
        let open = self.buffer.accept(msg.as_ref());
        if self.buffer.closed {
            self.shared.connected.store(false, Ordering::SeqCst);
        }
        open
    }

    /// Move every message russh has already queued into the buffer
    async fn pump(&mut self) {
        if self.buffer.eof {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let mut channel = shared.channel.lock().await;
        loop {
            // Without the coop budget only an empty queue can end the loop
            let next = tokio::task::unconstrained(timeout(Duration::ZERO, channel.wait())).await;
            match next {
                Ok(msg) => {
                    if !self.accept(msg) {
                        break;
                    }
                }
                // Nothing queued right now
                Err(_) => break,
            }
        }
    }
}

#[async_trait]
impl InputStream for ChannelInput {
    async fn available(&mut self) -> io::Result<usize> {
        self.pump().await;
        Ok(self.buffer.len())
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let shared = Arc::clone(&self.shared);
        let mut channel = shared.channel.lock().await;
        while self.buffer.starved() {
            let msg = channel.wait().await;
            self.accept(msg);
        }
        Ok(self.buffer.take(buf))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.buffer.clear();
        Ok(())
    }
}

/// Keystrokes sent as channel data
struct ChannelOutput {
    shared: Arc<SharedChannel>,
}

#[async_trait]
impl OutputStream for ChannelOutput {
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let channel = self.shared.channel.lock().await;
        channel
            .data(bytes)
            .await
            .map_err(|e| io::Error::other(e.to_string()))
    }

    async fn flush(&mut self) -> io::Result<()> {
        // channel data is handed to the session as soon as it is written
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        let channel = self.shared.channel.lock().await;
        channel
            .eof()
            .await
            .map_err(|e| io::Error::other(e.to_string()))
    }
}
