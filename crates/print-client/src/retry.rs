//! Exponential-backoff retry for transient printer failures.

use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::PrintError;
use crate::config::RetryConfig;

/// Execute `op`, retrying on retryable errors with exponential backoff.
///
/// Non-retryable errors are returned immediately. With a single attempt the
/// error is returned as-is. When more than one attempt fails, the last
/// retryable error is wrapped in [`PrintError::RetriesExhausted`].
pub(crate) fn retry_op<T, F>(config: &RetryConfig, mut op: F) -> Result<T, PrintError>
where
    F: FnMut() -> Result<T, PrintError>,
{
    if config.max_attempts == 0 {
        return Err(PrintError::InvalidConfig(
            "max_attempts must be >= 1".into(),
        ));
    }

    let mut attempt = 0;
    loop {
        match op() {
            Ok(val) => return Ok(val),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if config.max_attempts == 1 => return Err(e),
            Err(e) if attempt + 1 >= config.max_attempts => {
                return Err(PrintError::RetriesExhausted {
                    attempts: config.max_attempts,
                    last_error: Box::new(e),
                });
            }
            Err(e) => {
                let delay = compute_delay(config, attempt);
                debug!(attempt = attempt + 1, ?delay, error = %e, "retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

/// Compute the backoff delay for the given `attempt` (0-indexed).
///
/// delay = min(initial_delay * 2^attempt, max_delay), optionally with jitter.
fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config
        .initial_delay
        .saturating_mul(2u32.saturating_pow(attempt));
    let capped = base.min(config.max_delay);

    if !config.jitter {
        return capped;
    }

    // Pick a duration in [capped/2, capped] using the clock's nanoseconds.
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let half = capped / 2;
    let jitter_range_nanos = capped.as_nanos().saturating_sub(half.as_nanos());
    if jitter_range_nanos == 0 {
        return capped;
    }
    let offset_nanos = u128::from(nanos) % jitter_range_nanos;
    half + Duration::from_nanos(u64::try_from(offset_nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn retryable_error() -> PrintError {
        PrintError::ConnectionTimeout {
            addr: "10.0.0.1:9100".into(),
            timeout: Duration::from_millis(1),
            source: io::Error::new(io::ErrorKind::TimedOut, "mock timeout"),
        }
    }

    fn non_retryable_error() -> PrintError {
        PrintError::NoAddressFound("bad-address".into())
    }

    fn fast_retry_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            jitter: false,
        }
    }

    /// Returns results from a pre-loaded sequence, then `Ok(())`.
    fn scripted(results: Vec<Result<(), PrintError>>) -> impl FnMut() -> Result<(), PrintError> {
        let mut results = results.into_iter();
        move || results.next().unwrap_or(Ok(()))
    }

    #[test]
    fn non_retryable_error_returned_immediately() {
        let mut calls = 0;
        let mut op = scripted(vec![Err(non_retryable_error())]);
        let result = retry_op(&fast_retry_config(3), || {
            calls += 1;
            op()
        });

        assert_eq!(calls, 1);
        match result.unwrap_err() {
            PrintError::NoAddressFound(addr) => assert_eq!(addr, "bad-address"),
            other => panic!("expected NoAddressFound, got: {other:?}"),
        }
    }

    #[test]
    fn retryable_error_retried_up_to_max_attempts() {
        let mut calls = 0;
        let mut op = scripted(vec![
            Err(retryable_error()),
            Err(retryable_error()),
            Err(retryable_error()),
        ]);
        let result = retry_op(&fast_retry_config(3), || {
            calls += 1;
            op()
        });

        assert_eq!(calls, 3);
        match result.unwrap_err() {
            PrintError::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.is_timeout());
            }
            other => panic!("expected RetriesExhausted, got: {other:?}"),
        }
    }

    #[test]
    fn succeeds_on_retry() {
        let mut calls = 0;
        let mut op = scripted(vec![Err(retryable_error()), Err(retryable_error())]);
        let result = retry_op(&fast_retry_config(5), || {
            calls += 1;
            op()
        });

        assert!(result.is_ok());
        // Two failures + one success.
        assert_eq!(calls, 3);
    }

    #[test]
    fn single_attempt_returns_original_error() {
        let result = retry_op(&fast_retry_config(1), scripted(vec![Err(retryable_error())]));
        assert!(matches!(
            result.unwrap_err(),
            PrintError::ConnectionTimeout { .. }
        ));
    }

    #[test]
    fn max_attempts_zero_returns_error() {
        let mut calls = 0;
        let result: Result<(), _> = retry_op(&fast_retry_config(0), || {
            calls += 1;
            Ok(())
        });
        match result.unwrap_err() {
            PrintError::InvalidConfig(msg) => assert!(msg.contains("max_attempts")),
            other => panic!("expected InvalidConfig, got: {other:?}"),
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn compute_delay_respects_max_delay() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            jitter: false,
        };

        assert_eq!(compute_delay(&config, 0), Duration::from_secs(1));
        assert_eq!(compute_delay(&config, 1), Duration::from_secs(2));
        assert_eq!(compute_delay(&config, 2), Duration::from_secs(4));
        assert_eq!(compute_delay(&config, 3), Duration::from_secs(5));
        assert_eq!(compute_delay(&config, 10), Duration::from_secs(5));
    }

    #[test]
    fn compute_delay_with_jitter_stays_in_range() {
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            jitter: true,
        };

        for attempt in 0..4 {
            let base = config
                .initial_delay
                .saturating_mul(2u32.saturating_pow(attempt))
                .min(config.max_delay);
            let half = base / 2;

            for _ in 0..10 {
                let d = compute_delay(&config, attempt);
                assert!(
                    d >= half && d <= base,
                    "attempt {attempt}: delay {d:?} not in [{half:?}, {base:?}]",
                );
            }
        }
    }
}
