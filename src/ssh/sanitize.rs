//! Input validation for shell commands
//!
//! All checks run before the channel is touched.

use crate::error::{Result, ShellError};

/// Whether a string is empty or whitespace only
///
/// # Examples
/// ```
/// use ssh_shell::ssh::sanitize::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank(" \t\r\n"));
/// assert!(!is_blank(" ls "));
/// ```
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Reject a blank command
pub fn validate_command(command: &str) -> Result<()> {
    if is_blank(command) {
        return Err(ShellError::BlankCommand);
    }
    Ok(())
}

/// Reject a blank command or a blank root password
pub fn validate_elevation(command: &str, root_password: &str) -> Result<()> {
    if is_blank(command) || is_blank(root_password) {
        return Err(ShellError::BlankElevation);
    }
    Ok(())
}

/// Reject an empty batch or one with any blank entry
pub fn validate_commands<S: AsRef<str>>(commands: &[S]) -> Result<()> {
    if commands.is_empty() {
        return Err(ShellError::EmptyBatch);
    }
    if let Some(index) = commands.iter().position(|c| is_blank(c.as_ref())) {
        return Err(ShellError::BlankBatchEntry(index));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_command_valid() {
        assert!(validate_command("ls -la").is_ok());
        assert!(validate_command("  ls -la  ").is_ok());
    }

    #[test]
    fn test_validate_command_blank() {
        for blank in ["", "   ", "\t", "\r\n"] {
            let err = validate_command(blank).unwrap_err();
            assert_eq!(err.to_string(), "command is blank!");
        }
    }

    #[test]
    fn test_validate_elevation() {
        assert!(validate_elevation("whoami", "secret").is_ok());
        assert!(matches!(
            validate_elevation("", "secret"),
            Err(ShellError::BlankElevation)
        ));
        assert!(matches!(
            validate_elevation("whoami", "  "),
            Err(ShellError::BlankElevation)
        ));
    }

    #[test]
    fn test_validate_commands_empty() {
        let commands: [&str; 0] = [];
        let err = validate_commands(&commands).unwrap_err();
        assert_eq!(err.to_string(), "commands is blank!");
    }

    #[test]
    fn test_validate_commands_blank_entry() {
        let err = validate_commands(&["ls", ""]).unwrap_err();
        assert!(matches!(err, ShellError::BlankBatchEntry(1)));
    }

    #[test]
    fn test_validate_commands_owned() {
        let commands = vec!["cd /data".to_string(), "ls".to_string()];
        assert!(validate_commands(&commands).is_ok());
    }
}
