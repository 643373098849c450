//! Backoff for resending commands and reconnecting the event stream.

use std::future::Future;
use std::time::Duration;

use crate::commands::CommandResult;

/// Delays between attempts (exponential backoff).
const RETRY_DELAYS_MS: [u64; 3] = [200, 500, 1000];

/// Upper bound for the event stream reconnect delay.
pub const MAX_RECONNECT_DELAY_MS: u64 = 5_000;

/// Runs a command send, resending on transient failures.
///
/// Only failures where the request never reached the server are retried,
/// with 200ms, 500ms and 1000ms between attempts.
pub(crate) async fn with_retry<F, Fut>(action: &str, mut operation: F) -> CommandResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CommandResult<()>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < RETRY_DELAYS_MS.len() => {
                let delay_ms = RETRY_DELAYS_MS[attempt];
                attempt += 1;
                log::info!(
                    "[Retry] {} failed ({}), attempt {}/{} in {}ms",
                    action,
                    e,
                    attempt + 1,
                    RETRY_DELAYS_MS.len() + 1,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Delay before reconnect attempt `attempt` (0-based).
///
/// Follows the retry table, then doubles up to [`MAX_RECONNECT_DELAY_MS`].
#[must_use]
pub fn reconnect_delay(attempt: usize) -> Duration {
    let ms = match RETRY_DELAYS_MS.get(attempt) {
        Some(&ms) => ms,
        None => {
            let last = RETRY_DELAYS_MS[RETRY_DELAYS_MS.len() - 1];
            let extra = (attempt + 1 - RETRY_DELAYS_MS.len()).min(16) as u32;
            last.saturating_mul(1 << extra)
        }
    };
    Duration::from_millis(ms.min(MAX_RECONNECT_DELAY_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn reconnect_delay_backs_off_and_caps() {
        let delays: Vec<u64> = (0..7)
            .map(|n| reconnect_delay(n).as_millis() as u64)
            .collect();
        assert_eq!(delays, [200, 500, 1000, 2000, 4000, 5000, 5000]);
        assert_eq!(reconnect_delay(1_000), Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_until_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry("play", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(CommandError::HttpStatus(503))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_last_delay() {
        let calls = AtomicUsize::new(0);
        let result = with_retry("next", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CommandError::HttpStatus(503)) }
        })
        .await;

        assert!(matches!(result, Err(CommandError::HttpStatus(503))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result = with_retry("seek", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CommandError::HttpStatus(404)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
