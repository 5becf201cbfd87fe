//! Command execution over the shell channel
//!
//! Provides [`CommandRequest`] and the single-command cycle: write the
//! command line, wait the fixed completion time, drain whatever output the
//! terminal has produced.

use std::io;
use std::time::Duration;

use tracing::debug;

use super::charset::Charset;
use super::completion::wait_for_completion;
use super::drain::drain_output;
use super::sanitize::validate_command;
use super::session::ShellSession;
use super::transport::OutputStream;
use crate::config::{DEFAULT_EXEC_TIMEOUT_MS, LINE_TERMINATOR};
use crate::error::Result;

/// One command to run in the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Command line, sent without its terminator
    pub command: String,

    /// How long to wait before collecting output; zero means the default
    pub timeout: Duration,

    /// Charset used to decode terminal output
    pub in_charset: Charset,

    /// Charset used to encode the command
    pub out_charset: Charset,
}

impl CommandRequest {
    /// Request with the default wait and UTF-8 in both directions
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: default_exec_timeout(),
            in_charset: Charset::utf8(),
            out_charset: Charset::utf8(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_charsets(mut self, in_charset: Charset, out_charset: Charset) -> Self {
        self.in_charset = in_charset;
        self.out_charset = out_charset;
        self
    }

    /// The wait actually used: the requested timeout if positive, else the default
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            default_exec_timeout()
        } else {
            self.timeout
        }
    }
}

/// Default wait after each command
pub fn default_exec_timeout() -> Duration {
    Duration::from_millis(DEFAULT_EXEC_TIMEOUT_MS)
}

/// Write `line` and the carriage-return terminator, then flush
pub(crate) async fn send_line(
    output: &mut dyn OutputStream,
    line: &str,
    charset: Charset,
) -> io::Result<()> {
    output.write_all(&charset.encode(line)).await?;
    output.write_all(&charset.encode(LINE_TERMINATOR)).await?;
    output.flush().await
}

impl ShellSession {
    /// Execute a command with the default wait and UTF-8
    ///
    /// The channel stays open; call again or [`disconnect`](Self::disconnect).
    pub async fn exec_command(&mut self, command: &str) -> Result<String> {
        self.execute(&CommandRequest::new(command)).await
    }

    /// Execute a command with a custom wait and UTF-8
    pub async fn exec_command_with_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<String> {
        self.execute(&CommandRequest::new(command).with_timeout(timeout))
            .await
    }

    /// Execute a command in the shell and return the terminal output
    ///
    /// This method:
    /// 1. Rejects a blank command
    /// 2. Requires the shell channel to be connected
    /// 3. Sends the command followed by a carriage return
    /// 4. Waits the effective timeout, regardless of output
    /// 5. Drains the output already buffered
    ///
    /// The output is whatever the terminal produced during the wait, which
    /// may include the echoed command and prompts, and may be cut short if
    /// the command outlives the wait.
    ///
    /// # Returns
    /// * `Ok(String)` - Decoded terminal output
    /// * `Err(ShellError::BlankCommand)` - Nothing was sent
    /// * `Err(ShellError::ChannelDisconnected)` - Nothing was sent
    /// * `Err(ShellError::Io)` - Sending or draining failed
    pub async fn execute(&mut self, request: &CommandRequest) -> Result<String> {
        validate_command(&request.command)?;
        let wait = request.effective_timeout();

        let streams = self.streams()?;

        debug!("Sending command to shell: {}", request.command);
        send_line(streams.output, &request.command, request.out_charset).await?;
        wait_for_completion(wait).await;

        let output = drain_output(streams.input, request.in_charset).await?;
        Ok(output)
    }
}
