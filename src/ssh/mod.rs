//! Interactive shell sessions over SSH
//!
//! This module provides the shell session lifecycle, the russh transport,
//! and the command execution variants built on one PTY-backed channel.

pub mod batch;
pub mod charset;
pub mod command;
pub mod completion;
pub mod config;
pub mod connection;
pub mod drain;
pub mod elevation;
pub mod handler;
pub mod sanitize;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

// Re-exports
pub use charset::Charset;
pub use command::CommandRequest;
pub use completion::wait_for_completion;
pub use config::{HostKeyPolicy, PtySettings, SshConfig};
pub use connection::RusshConnector;
pub use drain::drain_output;
pub use elevation::SU_ROOT_COMMAND;
pub use handler::SshHandler;
pub use session::ShellSession;
pub use transport::{Connector, InputStream, OutputStream, ShellChannel, TransportSession};
