//! ZPL print client: deliver rendered labels to Zebra printers.
//!
//! Three transports sit behind one [`Dispatcher`]: raw TCP (port 9100), the
//! host's print queue in raw mode, and export to a `.zpl` file. The core API
//! is synchronous (`std::net`, `std::process`), with no async runtime
//! required.
mod addr;
mod config;
mod dispatch;
mod error;
mod export;
mod outcome;
mod queue;
mod retry;
mod settings;
mod tcp;

pub use addr::{DEFAULT_PORT, resolve_printer_addr};
pub use config::{DispatchConfig, PrinterTimeouts, RetryConfig};
pub use dispatch::{Dispatcher, network_failure_message, queue_failure_message};
pub use error::PrintError;
pub use export::{export_labels, label_file_name, write_copies};
pub use outcome::{PrintOutcome, PrintStatus};
pub use queue::{CupsQueue, QueuePrinter, RawQueue, UnsupportedQueue, WindowsQueue, host_queue};
pub use settings::{DEFAULT_QUEUE_NAME, PrinterSettings, Transport};
pub use tcp::{TcpPrinter, probe};

// ── Traits ──────────────────────────────────────────────────────────────

/// Send data to a printer. All transports implement this.
pub trait Printer: Send {
    /// Send raw bytes to the printer.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a ZPL string to the printer (convenience wrapper over `send_raw`).
    fn send_zpl(&mut self, zpl: &str) -> Result<(), PrintError> {
        self.send_raw(zpl.as_bytes())
    }
}

// ── Copy helpers ────────────────────────────────────────────────────────

/// Result of sending several copies of one label.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Number of copies successfully sent.
    pub sent: u32,
    /// Copies requested.
    pub total: u32,
}

/// Send `copies` copies of `data`, stopping at the first failure.
///
/// Zero copies is a no-op that succeeds.
pub fn send_copies<P>(printer: &mut P, data: &[u8], copies: u32) -> Result<BatchResult, PrintError>
where
    P: Printer + ?Sized,
{
    for sent in 0..copies {
        if let Err(e) = printer.send_raw(data) {
            tracing::warn!(sent, total = copies, error = %e, "copy failed");
            return Err(e);
        }
    }
    Ok(BatchResult {
        sent: copies,
        total: copies,
    })
}
