//! SSH client handler implementation
//!
//! Implements the `russh::client::Handler` trait to decide whether the
//! server's host key is trusted.

use russh::keys::HashAlg;
use tracing::{debug, warn};

use super::config::HostKeyPolicy;

/// SSH client handler for russh
///
/// With [`HostKeyPolicy::AcceptAny`] every server key is accepted, which is
/// the default for shell sessions. [`HostKeyPolicy::Fingerprint`] pins the
/// key's SHA-256 fingerprint instead.
#[derive(Debug, Clone, Default)]
pub struct SshHandler {
    policy: HostKeyPolicy,
}

impl SshHandler {
    /// Create a new SSH handler
    pub fn new(policy: HostKeyPolicy) -> Self {
        Self { policy }
    }

    /// Apply the policy to a presented fingerprint
    fn accepts(&self, fingerprint: &str) -> bool {
        match &self.policy {
            HostKeyPolicy::AcceptAny => true,
            HostKeyPolicy::Fingerprint(expected) => expected == fingerprint,
        }
    }
}

impl russh::client::Handler for SshHandler {
    type Error = anyhow::Error;

    /// Verify the server's host key
    ///
    /// # Security Note
    /// `AcceptAny` performs no verification at all; a man-in-the-middle is
    /// not detected. Pin a fingerprint when that matters.
    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();
        debug!("Server host key fingerprint: {}", fingerprint);

        let accepted = self.accepts(&fingerprint);
        if !accepted {
            warn!("Rejecting host key {}: fingerprint is not pinned", fingerprint);
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_default_accepts_any() {
        let handler: SshHandler = Default::default();
        assert!(handler.accepts("SHA256:anything"));
        assert!(format!("{:?}", handler).contains("AcceptAny"));
    }

    #[test]
    fn test_handler_pinned_fingerprint() {
        let handler = SshHandler::new(HostKeyPolicy::Fingerprint("SHA256:good".into()));
        assert!(handler.accepts("SHA256:good"));
        assert!(!handler.accepts("SHA256:evil"));
    }
}
