//! SSH configuration types
//!
//! Connection parameters for a shell session, including host identity
//! handling and the pseudo-terminal requested for the shell.

use std::time::Duration;

use crate::config::{CONNECT_TIMEOUT_MS, DEFAULT_PORT};

/// How the server's host key is checked during the handshake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept whatever key the server presents
    #[default]
    AcceptAny,

    /// Accept only a key whose SHA-256 fingerprint matches (`SHA256:...`)
    Fingerprint(String),
}

/// Pseudo-terminal requested for the shell channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtySettings {
    /// Terminal type reported to the server
    pub term: String,
    pub cols: u32,
    pub rows: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Default for PtySettings {
    fn default() -> Self {
        Self {
            term: "vt100".to_string(),
            cols: 80,
            rows: 24,
            pixel_width: 640,
            pixel_height: 480,
        }
    }
}

/// SSH connection configuration
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Remote hostname or IP address
    pub host: String,

    /// SSH port (default: 22)
    pub port: u16,

    /// Username for authentication
    pub username: String,

    /// Password for password authentication
    pub password: String,

    /// Deadline for the handshake, authentication and opening the shell
    pub connect_timeout: Duration,

    /// Host key verification policy
    pub host_key_policy: HostKeyPolicy,

    /// Terminal allocated for the shell
    pub pty: PtySettings,
}

impl SshConfig {
    /// Create a new SSH configuration with minimal required fields
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: String::new(),
            connect_timeout: Duration::from_millis(CONNECT_TIMEOUT_MS),
            host_key_policy: HostKeyPolicy::default(),
            pty: PtySettings::default(),
        }
    }

    /// Set the SSH port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set password authentication
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the connection deadline
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the host key policy
    pub fn with_host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    /// Set the pseudo-terminal settings
    pub fn with_pty(mut self, pty: PtySettings) -> Self {
        self.pty = pty;
        self
    }

    /// `host:port` form used for the TCP connect
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
