//! Configuration and CLI argument parsing for the SSH shell client

use std::time::Duration;

use clap::Parser;

use crate::error::{Result, ShellError};
use crate::ssh::{Charset, CommandRequest, HostKeyPolicy, SshConfig};

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// Connection establishment deadline in milliseconds
pub const CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Default wait after sending a command, in milliseconds
pub const DEFAULT_EXEC_TIMEOUT_MS: u64 = 1_000;

/// Terminator sent after every command or password
pub const LINE_TERMINATOR: &str = "\r";

/// SSH shell client CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "ssh-shell")]
#[command(version)]
#[command(about = "Run commands in an interactive SSH shell and capture the terminal output")]
pub struct Args {
    /// SSH host to connect to
    #[arg(long, env = "SSH_SHELL_HOST")]
    pub host: String,

    /// SSH port
    #[arg(long, default_value_t = DEFAULT_PORT, env = "SSH_SHELL_PORT")]
    pub port: u16,

    /// SSH username
    #[arg(long, env = "SSH_SHELL_USER")]
    pub user: String,

    /// SSH password
    #[arg(long, env = "SSH_SHELL_PASSWORD", default_value = "")]
    pub password: String,

    /// Switch to root with this password before running the command
    #[arg(long, env = "SSH_SHELL_ROOT_PASSWORD")]
    pub root_password: Option<String>,

    /// Wait after the command in milliseconds (0 uses the default of 1000)
    #[arg(long, default_value_t = 0, env = "SSH_SHELL_TIMEOUT")]
    pub timeout: u64,

    /// Connection deadline in milliseconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_MS, env = "SSH_SHELL_CONNECT_TIMEOUT")]
    pub connect_timeout: u64,

    /// Charset used to decode terminal output
    #[arg(long, default_value = "UTF-8", env = "SSH_SHELL_IN_CHARSET")]
    pub in_charset: String,

    /// Charset used to encode commands
    #[arg(long, default_value = "UTF-8", env = "SSH_SHELL_OUT_CHARSET")]
    pub out_charset: String,

    /// Only accept a host key with this SHA-256 fingerprint (SHA256:...)
    #[arg(long, env = "SSH_SHELL_HOST_KEY_FINGERPRINT")]
    pub host_key_fingerprint: Option<String>,

    /// Print the result envelope as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Commands to run; several commands run as a batch
    #[arg(required = true)]
    pub commands: Vec<String>,
}

/// What the binary does once connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// One command; the session is closed by the caller afterwards
    Single(CommandRequest),

    /// One command run as root via `su root`
    Elevated {
        request: CommandRequest,
        root_password: String,
    },

    /// Several commands, each with the default wait
    Batch {
        commands: Vec<String>,
        in_charset: Charset,
        out_charset: Charset,
    },
}

/// Parsed and validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings
    pub ssh: SshConfig,

    /// What to run
    pub mode: RunMode,

    /// Whether to print JSON
    pub json: bool,
}

impl Config {
    /// Create Config from CLI Args
    pub fn from_args(args: Args) -> Result<Self> {
        let mut errors = Vec::new();

        if args.host.trim().is_empty() {
            errors.push("Missing required --host".to_string());
        }

        if args.user.trim().is_empty() {
            errors.push("Missing required --user".to_string());
        }

        if args.root_password.is_some() && args.commands.len() != 1 {
            errors.push(format!(
                "--root-password runs exactly one command, got {}",
                args.commands.len()
            ));
        }

        let in_charset = collect_charset(&args.in_charset, &mut errors);
        let out_charset = collect_charset(&args.out_charset, &mut errors);

        if !errors.is_empty() {
            return Err(ShellError::config(errors.join("\n")));
        }

        let mut ssh = SshConfig::new(args.host, args.user)
            .with_port(args.port)
            .with_password(args.password)
            .with_connect_timeout(Duration::from_millis(args.connect_timeout));
        if let Some(fingerprint) = args.host_key_fingerprint {
            ssh = ssh.with_host_key_policy(HostKeyPolicy::Fingerprint(fingerprint));
        }

        let mode = build_mode(
            args.commands,
            args.root_password,
            Duration::from_millis(args.timeout),
            in_charset,
            out_charset,
        );

        Ok(Config {
            ssh,
            mode,
            json: args.json,
        })
    }
}

/// Resolve a charset label, recording a problem instead of failing
fn collect_charset(label: &str, errors: &mut Vec<String>) -> Charset {
    match Charset::for_label(label) {
        Ok(charset) => charset,
        Err(e) => {
            errors.push(e.to_string());
            Charset::utf8()
        }
    }
}

fn build_mode(
    mut commands: Vec<String>,
    root_password: Option<String>,
    timeout: Duration,
    in_charset: Charset,
    out_charset: Charset,
) -> RunMode {
    if commands.len() > 1 {
        return RunMode::Batch {
            commands,
            in_charset,
            out_charset,
        };
    }

    let command = commands.pop().unwrap_or_default();
    let request = CommandRequest::new(command)
        .with_timeout(timeout)
        .with_charsets(in_charset, out_charset);

    match root_password {
        Some(root_password) => RunMode::Elevated {
            request,
            root_password,
        },
        None => RunMode::Single(request),
    }
}
