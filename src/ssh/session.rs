//! Shell session lifecycle
//!
//! A [`ShellSession`] owns one transport connection, at most one shell
//! channel, and the two streams over that channel. Commands are executed
//! through the methods in [`command`](super::command),
//! [`elevation`](super::elevation) and [`batch`](super::batch).

use std::sync::Arc;

use tracing::{debug, error, info};

use super::config::SshConfig;
use super::connection::RusshConnector;
use super::transport::{Connector, InputStream, OutputStream, ShellChannel, TransportSession};
use crate::error::{Result, ShellError};

/// Interactive shell over SSH
///
/// All execute methods take `&mut self`: one session serves one caller at a
/// time. Share it behind a mutex or a dedicated task if several tasks need it.
pub struct ShellSession {
    config: SshConfig,
    connector: Arc<dyn Connector>,
    transport: Option<Box<dyn TransportSession>>,
    channel: Option<Box<dyn ShellChannel>>,
    input: Option<Box<dyn InputStream>>,
    output: Option<Box<dyn OutputStream>>,
}

/// Both streams of the shell channel, borrowed for one call
pub(crate) struct Streams<'a> {
    pub input: &'a mut dyn InputStream,
    pub output: &'a mut dyn OutputStream,
}

impl ShellSession {
    /// Create a session that connects with russh
    ///
    /// Nothing happens on the network until [`connect`](Self::connect).
    pub fn new(config: SshConfig) -> Self {
        Self::with_connector(config, Arc::new(RusshConnector::new()))
    }

    /// Create a session on a custom transport provider
    pub fn with_connector(config: SshConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            transport: None,
            channel: None,
            input: None,
            output: None,
        }
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Open the connection, authenticate, and start a PTY shell
    ///
    /// Each step is bounded by the configured connect timeout. A session that
    /// is already connected is left as it is. On failure everything opened so
    /// far is released again.
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!("Already connected to SSH server");
            return Ok(());
        }

        // a channel closed by the remote end still holds its connection and streams
        if self.holds_resources() {
            debug!("Releasing stale shell before reconnecting");
            self.disconnect().await;
        }

        match self.establish().await {
            Ok(()) => {
                info!(
                    "Shell open on {}@{}",
                    self.config.username,
                    self.config.address()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to open shell on {}: {}", self.config.address(), e);
                self.disconnect().await;
                Err(e)
            }
        }
    }

    async fn establish(&mut self) -> Result<()> {
        let deadline = self.config.connect_timeout;

        let opened = self.connector.open_session(&self.config).await?;
        let transport = self.transport.insert(opened);

        transport
            .authenticate(&self.config.username, &self.config.password, deadline)
            .await?;

        let channel = transport.open_shell(&self.config.pty, deadline).await?;
        self.channel = Some(channel);
        Ok(())
    }

    /// Whether the shell channel is open
    pub fn is_connected(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| channel.is_connected())
    }

    fn holds_resources(&self) -> bool {
        self.transport.is_some()
            || self.channel.is_some()
            || self.input.is_some()
            || self.output.is_some()
    }

    /// Streams over the connected channel, opened on first use
    pub(crate) fn streams(&mut self) -> Result<Streams<'_>> {
        let channel = match self.channel.as_mut() {
            Some(channel) if channel.is_connected() => channel,
            _ => return Err(ShellError::ChannelDisconnected),
        };

        if self.input.is_none() {
            self.input = Some(channel.open_input()?);
        }
        if self.output.is_none() {
            self.output = Some(channel.open_output()?);
        }

        match (self.input.as_deref_mut(), self.output.as_deref_mut()) {
            (Some(input), Some(output)) => Ok(Streams { input, output }),
            _ => Err(ShellError::ChannelDisconnected),
        }
    }

    /// Release the output stream, input stream, channel and connection
    ///
    /// Each release is attempted even if an earlier one failed; failures are
    /// logged and swallowed. Safe to call any number of times, on a session
    /// in any state.
    pub async fn disconnect(&mut self) {
        let mut released = false;

        if let Some(mut output) = self.output.take() {
            released = true;
            if let Err(e) = output.close().await {
                error!("ShellSession.disconnect output stream close has error: {}", e);
            }
        }

        if let Some(mut input) = self.input.take() {
            released = true;
            if let Err(e) = input.close().await {
                error!("ShellSession.disconnect input stream close has error: {}", e);
            }
        }

        if let Some(mut channel) = self.channel.take() {
            released = true;
            if let Err(e) = channel.close().await {
                error!("ShellSession.disconnect channel close has error: {}", e);
            }
        }

        if let Some(mut transport) = self.transport.take() {
            released = true;
            if let Err(e) = transport.disconnect().await {
                error!("ShellSession.disconnect session disconnect has error: {}", e);
            }
        }

        if released {
            info!("SSH shell session to {} closed", self.config.address());
        }
    }
}

impl std::fmt::Debug for ShellSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellSession")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("username", &self.config.username)
            .field("connected", &self.is_connected())
            .field("streams_open", &self.input.is_some())
            .finish()
    }
}
