//! Configuration types for the print client.

use std::path::PathBuf;
use std::time::Duration;

/// Dispatcher configuration: timeouts, retry, and export location.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Network timeout settings.
    pub timeouts: PrinterTimeouts,
    /// Retry settings for establishing the printer connection.
    pub retry: RetryConfig,
    /// Directory that receives exported `.zpl` files.
    pub export_dir: PathBuf,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeouts: PrinterTimeouts::default(),
            retry: RetryConfig::default(),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Timeout settings for printer connections.
///
/// Defaults are tuned for LAN-connected label printers:
/// - `connect`: 10s for print jobs
/// - `probe`: 5s for connection tests
/// - `write`: 30s (labels with embedded ^GF graphics can be 500KB+)
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to wait for the TCP connection of a print job.
    pub connect: Duration,
    /// Maximum time to wait for the TCP connection of a connection test.
    pub probe: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            probe: Duration::from_secs(5),
            write: Duration::from_secs(30),
        }
    }
}

/// Retry settings for transient connection failures.
///
/// Uses exponential backoff with optional jitter. Only errors where
/// `PrintError::is_retryable()` returns `true` are retried. The default of a
/// single attempt disables retry.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to add random jitter to retry delays.
    pub jitter: bool,
}

impl RetryConfig {
    /// Retry up to `max_attempts` times with the default backoff.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}
