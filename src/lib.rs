//! SSH Shell - run commands in an interactive remote shell
//!
//! This crate drives a PTY-backed shell channel over SSH: it sends command
//! lines, waits a fixed time for them to finish, and captures whatever the
//! terminal printed. On top of the single-command cycle it offers a
//! `su root` elevation sequence and a batch mode for command lists.
//!
//! # Features
//!
//! - Password authentication with a 30 second connection deadline
//! - Fixed-wait completion detection (1 second by default)
//! - Configurable charsets for commands and terminal output
//! - `su root` elevation and multi-command batches, both single-use
//! - Pluggable transport provider; russh is the default
//!
//! # Example Usage (library)
//!
//! ```no_run
//! use ssh_shell::{ShellSession, SshConfig};
//!
//! # async fn run() -> ssh_shell::Result<()> {
//! let config = SshConfig::new("192.168.1.100", "admin").with_password("secret");
//! let mut session = ShellSession::new(config);
//! session.connect().await?;
//! let listing = session.exec_command("ls -la").await?;
//! println!("{}", listing);
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Example Usage (CLI)
//!
//! ```bash
//! ssh-shell --host=192.168.1.100 --user=admin --password=secret "cd /data" ls
//! ```

pub mod config;
pub mod error;
pub mod outcome;
pub mod ssh;

// Re-exports for convenience
pub use config::{Args, Config, RunMode};
pub use error::{FailureKind, Result, ShellError};
pub use outcome::ExecutionResult;
pub use ssh::{Charset, CommandRequest, HostKeyPolicy, PtySettings, ShellSession, SshConfig};
