//! Normalized result of a dispatch or connection test.

/// Result category reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PrintStatus {
    /// The operation completed.
    Success,
    /// The operation failed; `message` says why.
    Error,
    /// Nothing was attempted; `message` explains.
    Info,
}

/// Structured outcome of every dispatcher operation.
///
/// Failures are data, not errors: callers can always serialize this value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrintOutcome {
    /// Result category.
    pub status: PrintStatus,
    /// Human-readable description.
    pub message: String,
    /// Name of the exported file (file transport).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub filename: Option<String>,
    /// Echo of the exported ZPL (file transport).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub zpl_code: Option<String>,
}

impl PrintOutcome {
    fn new(status: PrintStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            filename: None,
            zpl_code: None,
        }
    }

    /// A `success` outcome.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(PrintStatus::Success, message)
    }

    /// An `error` outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(PrintStatus::Error, message)
    }

    /// An `info` outcome.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(PrintStatus::Info, message)
    }

    /// Whether the status is [`PrintStatus::Success`].
    pub fn is_success(&self) -> bool {
        self.status == PrintStatus::Success
    }
}
