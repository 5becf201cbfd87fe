//! Command completion heuristic
//!
//! A shell channel gives no structured "command finished" signal, so a sent
//! command is considered done once a fixed wait has elapsed. Output that
//! arrives earlier does not shorten the wait; a command still running at the
//! deadline is captured only up to what it has printed so far.

use std::time::Duration;

use tracing::debug;

/// Wait `duration` and return, no matter what the channel is doing
pub async fn wait_for_completion(duration: Duration) {
    debug!("Waiting {}ms for command to complete", duration.as_millis());
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::mock::assert_waited;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_waits_exactly_the_duration() {
        let start = Instant::now();
        wait_for_completion(Duration::from_millis(1000)).await;
        assert_waited(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_wall_clock_wait_is_not_shortened() {
        let start = std::time::Instant::now();
        wait_for_completion(Duration::from_millis(50)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(1000));
    }
}
