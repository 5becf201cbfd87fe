//! SSH Shell - Entry point
//!
//! Parses CLI arguments, opens the shell, runs the requested command, single,
//! elevated or batch, prints the result and always disconnects.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ssh_shell::config::{Args, Config, RunMode};
use ssh_shell::outcome::ExecutionResult;
use ssh_shell::ssh::ShellSession;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let args = Args::parse();

    // Logs go to stderr; stdout carries the captured output
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Validate and create config
    let config = Config::from_args(args)?;

    info!("SSH Shell v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Connecting to {}@{}:{}",
        config.ssh.username, config.ssh.host, config.ssh.port
    );

    let mut session = ShellSession::new(config.ssh.clone());

    let connected = session.connect().await;
    if connected.is_err() {
        report(&ExecutionResult::from_connect(&connected), config.json)?;
        return Ok(ExitCode::FAILURE);
    }

    let outcome = tokio::select! {
        result = run(&mut session, &config.mode) => Some(ExecutionResult::from(result)),
        _ = tokio::signal::ctrl_c() => {
            warn!("Received SIGINT (Ctrl+C), closing session...");
            None
        }
    };

    // Elevated and batch runs have already disconnected; this is a no-op then
    session.disconnect().await;

    let Some(outcome) = outcome else {
        return Ok(ExitCode::from(130));
    };

    report(&outcome, config.json)?;

    if outcome.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run(session: &mut ShellSession, mode: &RunMode) -> ssh_shell::Result<String> {
    match mode {
        RunMode::Single(request) => session.execute(request).await,
        RunMode::Elevated {
            request,
            root_password,
        } => session.su_root_execute(request, root_password).await,
        RunMode::Batch {
            commands,
            in_charset,
            out_charset,
        } => {
            session
                .exec_multi_command_with_charsets(commands, *in_charset, *out_charset)
                .await
        }
    }
}

fn report(result: &ExecutionResult, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(result).context("Failed to render result as JSON")?;
        println!("{}", rendered);
        return Ok(());
    }

    if result.success {
        if let Some(ref payload) = result.payload {
            print!("{}", payload);
        }
        info!("{}", result.message);
    } else {
        error!("{}", result.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssh_shell::ShellError;

    #[test]
    fn test_report_json_renders_failures() {
        let result = ExecutionResult::failed(&ShellError::ChannelDisconnected);
        assert!(report(&result, true).is_ok());
    }

    #[test]
    fn test_startup_errors_keep_their_own_message() {
        let err = anyhow::Error::from(ShellError::config("--host is required"));

        assert_eq!(err.to_string(), "Configuration error: --host is required");
        assert!(!err.to_string().starts_with("Execute has exception"));
    }
}
