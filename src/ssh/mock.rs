//! Scripted in-memory transport for tests
//!
//! Every carriage-return-terminated line written to the shell is looked up
//! in a response table and the matching output is appended to the input
//! buffer straight away, or after a delay for responses registered with
//! [`MockTransport::respond_after`]. All I/O calls and releases are recorded.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::config::{PtySettings, SshConfig};
use super::session::ShellSession;
use super::transport::{Connector, InputStream, OutputStream, ShellChannel, TransportSession};
use crate::error::{Result, ShellError};

/// Assert a paused-clock wait took `expected`, give or take timer rounding
pub(crate) fn assert_waited(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "waited {:?}, expected {:?}",
        elapsed,
        expected
    );
}

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub fail_auth: bool,
    pub fail_write: bool,
    pub fail_output_close: bool,
    pub responses: HashMap<String, Vec<u8>>,
    late_responses: HashMap<String, (Duration, Vec<u8>)>,
    pub sessions_opened: usize,
    /// Number of releases already recorded each time a session was opened
    pub releases_at_open: Vec<usize>,
    pub authenticated_as: Option<String>,
    pub pty_term: Option<String>,
    pub connected: bool,
    /// Every byte written to the shell
    pub written: Vec<u8>,
    /// Complete lines received, in order
    pub lines: Vec<String>,
    partial_line: Vec<u8>,
    pending: VecDeque<u8>,
    /// Count of stream reads, writes and availability checks
    pub io_calls: usize,
    pub releases: Vec<&'static str>,
}

impl MockState {
    /// Record written bytes; returns the late output due for completed lines
    fn receive(&mut self, bytes: &[u8]) -> Vec<(Duration, Vec<u8>)> {
        let mut late = Vec::new();
        self.written.extend_from_slice(bytes);
        for &byte in bytes {
            if byte == b'\r' {
                let line = String::from_utf8_lossy(&self.partial_line).into_owned();
                self.partial_line.clear();
                if let Some(output) = self.responses.get(&line) {
                    self.pending.extend(output.iter().copied());
                }
                if let Some(response) = self.late_responses.get(&line) {
                    late.push(response.clone());
                }
                self.lines.push(line);
            } else {
                self.partial_line.push(byte);
            }
        }
        late
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output produced when `line` is entered
    pub fn respond(self, line: &str, output: impl Into<Vec<u8>>) -> Self {
        self.state()
            .responses
            .insert(line.to_string(), output.into());
        self
    }

    /// Output produced `delay` after `line` is entered, like a slow command
    pub fn respond_after(self, line: &str, delay: Duration, output: impl Into<Vec<u8>>) -> Self {
        self.state()
            .late_responses
            .insert(line.to_string(), (delay, output.into()));
        self
    }

    pub fn failing_auth(self) -> Self {
        self.state().fail_auth = true;
        self
    }

    pub fn failing_write(self) -> Self {
        self.state().fail_write = true;
        self
    }

    pub fn failing_output_close(self) -> Self {
        self.state().fail_output_close = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// A session to `host` as `root` over this transport
    pub fn session(&self) -> ShellSession {
        let config = SshConfig::new("host", "root").with_password("pw");
        ShellSession::with_connector(config, Arc::new(self.clone()))
    }

    /// Same as [`session`](Self::session), already connected
    pub async fn connected_session(&self) -> ShellSession {
        let mut session = self.session();
        session.connect().await.unwrap();
        session
    }
}

#[async_trait]
impl Connector for MockTransport {
    async fn open_session(&self, _config: &SshConfig) -> Result<Box<dyn TransportSession>> {
        let mut state = self.state();
        state.sessions_opened += 1;
        let released = state.releases.len();
        state.releases_at_open.push(released);
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl TransportSession for MockTransport {
    async fn authenticate(
        &mut self,
        username: &str,
        _password: &str,
        _deadline: Duration,
    ) -> Result<()> {
        let mut state = self.state();
        if state.fail_auth {
            return Err(ShellError::connect("Auth fail"));
        }
        state.authenticated_as = Some(username.to_string());
        Ok(())
    }

    async fn open_shell(
        &mut self,
        pty: &PtySettings,
        _deadline: Duration,
    ) -> Result<Box<dyn ShellChannel>> {
        let mut state = self.state();
        state.pty_term = Some(pty.term.clone());
        state.connected = true;
        Ok(Box::new(self.clone()))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.state().releases.push("session.disconnect");
        Ok(())
    }
}

#[async_trait]
impl ShellChannel for MockTransport {
    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn open_input(&mut self) -> io::Result<Box<dyn InputStream>> {
        Ok(Box::new(self.clone()))
    }

    fn open_output(&mut self) -> io::Result<Box<dyn OutputStream>> {
        Ok(Box::new(self.clone()))
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.state();
        state.connected = false;
        state.releases.push("channel.close");
        Ok(())
    }
}

#[async_trait]
impl InputStream for MockTransport {
    async fn available(&mut self) -> io::Result<usize> {
        let mut state = self.state();
        state.io_calls += 1;
        Ok(state.pending.len())
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        state.io_calls += 1;
        let len = buf.len().min(state.pending.len());
        for (slot, byte) in buf.iter_mut().zip(state.pending.drain(..len)) {
            *slot = byte;
        }
        Ok(len)
    }

    async fn close(&mut self) -> io::Result<()> {
        self.state().releases.push("input.close");
        Ok(())
    }
}

#[async_trait]
impl OutputStream for MockTransport {
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let late = {
            let mut state = self.state();
            state.io_calls += 1;
            if state.fail_write {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            state.receive(bytes)
        };

        for (delay, output) in late {
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                state.lock().unwrap().pending.extend(output);
            });
        }
        Ok(())
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.state().io_calls += 1;
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        let mut state = self.state();
        if state.fail_output_close {
            return Err(io::Error::other("output close failed"));
        }
        state.releases.push("output.close");
        Ok(())
    }
}
