//! Typed error types for the print client.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Printer error conditions, categorized by type.
///
/// Each variant carries enough context to produce a helpful error message.
/// Use [`PrintError::is_retryable()`] to classify transient vs permanent failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Connection --
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the printer responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}: {source}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    // -- Address --
    /// No printer address is configured for the network transport.
    #[error("no printer address configured")]
    MissingAddress,

    /// DNS resolution found no addresses for the given hostname.
    #[error("no address found for hostname: {0}")]
    NoAddressFound(String),

    // -- I/O --
    /// Writing data to the printer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    // -- Retry --
    /// All retry attempts have been exhausted.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last_error: Box<PrintError>,
    },

    // -- Configuration --
    /// An invalid configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Print queue --
    /// The host's print command could not be started.
    #[error("print command '{program}' not found")]
    QueueCommandNotFound {
        /// The program that was invoked.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The print command ran but reported failure.
    #[error("print queue '{queue}' rejected the job: {stderr}")]
    QueueRejected {
        /// The target queue name.
        queue: String,
        /// Exit status code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The printer listing command exited with a non-zero status.
    #[error("listing printers with '{program}' failed: {stderr}")]
    ListPrintersFailed {
        /// The listing command (`lpstat`, `wmic`).
        program: String,
        /// Exit status code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Talking to the print queue failed for another I/O reason.
    #[error("print queue I/O error: {0}")]
    QueueIo(#[source] io::Error),

    /// No print-queue backend exists for this operating system.
    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    // -- File export --
    /// Writing an export file failed.
    #[error("failed to write {}: {source}", path.display())]
    ExportFailed {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl PrintError {
    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PrintError::ConnectionTimeout { .. } | PrintError::WriteFailed(_)
        )
    }

    /// Whether this error (or the last attempt it wraps) is a connect timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            PrintError::ConnectionTimeout { .. } => true,
            PrintError::RetriesExhausted { last_error, .. } => last_error.is_timeout(),
            _ => false,
        }
    }

    /// Whether this error (or the last attempt it wraps) is a refused connection.
    pub fn is_refused(&self) -> bool {
        match self {
            PrintError::ConnectionRefused { .. } => true,
            PrintError::RetriesExhausted { last_error, .. } => last_error.is_refused(),
            _ => false,
        }
    }
}
