//! Bounded polling of the observer.

use lorbot_core::Result;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use crate::observer::GameObserver;

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCondition {
    /// Pause between refreshes
    pub interval: Duration,
    /// Refreshes before giving up
    pub attempts: usize,
}

impl PollCondition {
    /// Poll every `interval_ms`, at most `attempts` times.
    pub fn new(interval_ms: u64, attempts: usize) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            attempts,
        }
    }
}

/// Result of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Whether the check passed before the attempts ran out
    pub condition_met: bool,
    /// Refreshes performed
    pub refreshes: usize,
    /// Time waited in milliseconds
    pub waited_ms: u64,
}

/// Refresh `observer` until `check` passes or the attempts run out.
///
/// The check runs on the current state first, so a condition that already
/// holds costs no refresh. Refresh failures are returned.
pub async fn poll_observer<F>(
    observer: &mut GameObserver,
    condition: PollCondition,
    mut check: F,
) -> Result<PollOutcome>
where
    F: FnMut(&GameObserver) -> bool,
{
    let start = Instant::now();
    let mut refreshes = 0;

    loop {
        if check(observer) {
            return Ok(PollOutcome {
                condition_met: true,
                refreshes,
                waited_ms: start.elapsed().as_millis() as u64,
            });
        }
        if refreshes >= condition.attempts {
            return Ok(PollOutcome {
                condition_met: false,
                refreshes,
                waited_ms: start.elapsed().as_millis() as u64,
            });
        }

        tokio::time::sleep(condition.interval).await;
        observer.refresh().await?;
        refreshes += 1;
        trace!(refreshes, phase = %observer.phase(), "Polled");
    }
}
