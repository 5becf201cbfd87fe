//! Privilege elevation via `su root`
//!
//! The elevated run is a fixed choreography on the shell channel: enter
//! `su root`, wait, type the root password, wait, enter the command, wait,
//! then drain once. Nothing between the steps checks that the switch
//! actually worked: a wrong password shows up only in the captured output.
//!
//! The session is always disconnected afterwards, so an elevated shell is
//! never left behind for later commands.

use std::time::Duration;

use tracing::debug;

use super::command::{default_exec_timeout, send_line, CommandRequest};
use super::completion::wait_for_completion;
use super::drain::drain_output;
use super::sanitize::validate_elevation;
use super::session::ShellSession;
use crate::error::Result;

/// Command that starts the root shell
pub const SU_ROOT_COMMAND: &str = "su root";

impl ShellSession {
    /// Run `command` as root with the default wait and UTF-8
    ///
    /// Disconnects the session before returning.
    pub async fn su_root_exec_command(
        &mut self,
        command: &str,
        root_password: &str,
    ) -> Result<String> {
        self.su_root_execute(&CommandRequest::new(command), root_password)
            .await
    }

    /// Run `command` as root with a custom wait for the command step
    ///
    /// Disconnects the session before returning.
    pub async fn su_root_exec_command_with_timeout(
        &mut self,
        command: &str,
        root_password: &str,
        timeout: Duration,
    ) -> Result<String> {
        let request = CommandRequest::new(command).with_timeout(timeout);
        self.su_root_execute(&request, root_password).await
    }

    /// Switch to root, authenticate, and run the request
    ///
    /// A blank command or password is rejected without touching the session.
    /// Otherwise the session is disconnected on every exit path, success or
    /// failure. The returned output interleaves the password prompt, the
    /// root prompt and the command's own output.
    pub async fn su_root_execute(
        &mut self,
        request: &CommandRequest,
        root_password: &str,
    ) -> Result<String> {
        validate_elevation(&request.command, root_password)?;

        let result = self.run_elevated(request, root_password).await;
        self.disconnect().await;
        result
    }

    async fn run_elevated(
        &mut self,
        request: &CommandRequest,
        root_password: &str,
    ) -> Result<String> {
        let step_wait = default_exec_timeout();
        let streams = self.streams()?;

        debug!("Switching to root via '{}'", SU_ROOT_COMMAND);
        send_line(streams.output, SU_ROOT_COMMAND, request.out_charset).await?;
        wait_for_completion(step_wait).await;

        debug!("Sending root password");
        send_line(streams.output, root_password, request.out_charset).await?;
        wait_for_completion(step_wait).await;

        debug!("Sending command to root shell: {}", request.command);
        send_line(streams.output, &request.command, request.out_charset).await?;
        wait_for_completion(request.effective_timeout()).await;

        let output = drain_output(streams.input, request.in_charset).await?;
        Ok(output)
    }
}
