//! Render tick source.
//!
//! Drives position extrapolation at display rate. Each tick reports the time
//! actually elapsed since the previous one, so a late or skipped tick simply
//! yields a larger delta.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Periodic tick with measured deltas.
///
/// Dropping the ticker cancels its token, so anything waiting on
/// [`Ticker::cancel_token`] observes the end of the tick stream.
pub struct Ticker {
    interval: Interval,
    last: Instant,
    cancel: CancellationToken,
}

impl Ticker {
    /// Creates a ticker whose first tick fires one `period` from now.
    ///
    /// The ticker stops when `parent` is cancelled.
    #[must_use]
    pub fn new(period: Duration, parent: &CancellationToken) -> Self {
        let period = period.max(Duration::from_millis(1));
        let start = Instant::now();
        let mut interval = time::interval_at(start + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            last: start,
            cancel: parent.child_token(),
        }
    }

    /// Token cancelled when the ticker stops.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the next tick and returns the time since the previous one.
    ///
    /// Returns `None` once the ticker has been cancelled.
    pub async fn tick(&mut self) -> Option<Duration> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            _ = self.interval.tick() => {
                let now = Instant::now();
                let elapsed = now.saturating_duration_since(self.last);
                self.last = now;
                Some(elapsed)
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reports_elapsed_between_ticks() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_millis(16), &cancel);

        assert_eq!(ticker.tick().await, Some(Duration::from_millis(16)));
        assert_eq!(ticker.tick().await, Some(Duration::from_millis(16)));
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_reports_full_gap() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_millis(16), &cancel);
        ticker.tick().await;

        time::advance(Duration::from_millis(100)).await;
        let elapsed = ticker.tick().await.unwrap();
        assert!(elapsed >= Duration::from_millis(100), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_parent_cancelled() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_millis(16), &cancel);

        cancel.cancel();
        assert_eq!(ticker.tick().await, None);
    }

    #[tokio::test]
    async fn drop_cancels_token_but_not_parent() {
        let cancel = CancellationToken::new();
        let ticker = Ticker::new(Duration::from_millis(16), &cancel);
        let token = ticker.cancel_token();

        drop(ticker);
        assert!(token.is_cancelled());
        assert!(!cancel.is_cancelled());
    }
}
