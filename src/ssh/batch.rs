//! Sequential execution of several commands
//!
//! Commands are entered one after another on the same shell, each followed
//! by the default wait, and the output is drained once at the end. Suited to
//! short commands that respond promptly. The session is disconnected
//! afterwards.

use tracing::debug;

use super::charset::Charset;
use super::command::{default_exec_timeout, send_line};
use super::completion::wait_for_completion;
use super::drain::drain_output;
use super::sanitize::validate_commands;
use super::session::ShellSession;
use crate::error::Result;

impl ShellSession {
    /// Run `commands` in order with UTF-8 in both directions
    ///
    /// Disconnects the session before returning.
    pub async fn exec_multi_command<S: AsRef<str>>(&mut self, commands: &[S]) -> Result<String> {
        self.exec_multi_command_with_charsets(commands, Charset::utf8(), Charset::utf8())
            .await
    }

    /// Run `commands` in order and return the combined terminal output
    ///
    /// An empty list or any blank entry is rejected before anything is sent,
    /// so no command of a bad batch runs. Once validation passes the session
    /// is disconnected on every exit path.
    pub async fn exec_multi_command_with_charsets<S: AsRef<str>>(
        &mut self,
        commands: &[S],
        in_charset: Charset,
        out_charset: Charset,
    ) -> Result<String> {
        validate_commands(commands)?;

        let result = self.run_batch(commands, in_charset, out_charset).await;
        self.disconnect().await;
        result
    }

    async fn run_batch<S: AsRef<str>>(
        &mut self,
        commands: &[S],
        in_charset: Charset,
        out_charset: Charset,
    ) -> Result<String> {
        let wait = default_exec_timeout();
        let streams = self.streams()?;

        for (index, command) in commands.iter().enumerate() {
            let command = command.as_ref();
            debug!("Sending batch command {}/{}: {}", index + 1, commands.len(), command);
            send_line(streams.output, command, out_charset).await?;
            wait_for_completion(wait).await;
        }

        let output = drain_output(streams.input, in_charset).await?;
        Ok(output)
    }
}
