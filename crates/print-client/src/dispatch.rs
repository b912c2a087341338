//! The printer dispatcher: one entry point over all transports.
//!
//! [`Dispatcher::dispatch`] and [`Dispatcher::test_connection`] never return
//! `Err`. Every failure is caught here and turned into an error-status
//! [`PrintOutcome`] with a message aimed at the person at the printer.

use chrono::Local;
use tracing::{info, instrument, warn};

use crate::addr::resolve_printer_addr;
use crate::config::DispatchConfig;
use crate::export::export_labels;
use crate::queue::{QueuePrinter, RawQueue, host_queue};
use crate::retry::retry_op;
use crate::settings::{PrinterSettings, Transport};
use crate::tcp::{TcpPrinter, probe};
use crate::{PrintError, PrintOutcome, send_copies};

/// Sends rendered labels to the configured transport.
pub struct Dispatcher {
    queue: Box<dyn RawQueue>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher that submits queue jobs through `queue`.
    pub fn new(queue: Box<dyn RawQueue>, config: DispatchConfig) -> Self {
        Self { queue, config }
    }

    /// Create a dispatcher using this host's print-queue backend.
    pub fn with_host_queue(config: DispatchConfig) -> Self {
        Self::new(host_queue(), config)
    }

    /// Name of the print-queue backend in use.
    pub fn queue_backend(&self) -> &'static str {
        self.queue.backend()
    }

    /// Send `quantity` copies of `payload` using `settings`.
    ///
    /// A quantity of zero sends nothing and still reports success.
    #[instrument(skip(self, settings, payload), fields(transport = %settings.transport, payload_len = payload.len()))]
    pub fn dispatch(&self, settings: &PrinterSettings, payload: &str, quantity: u32) -> PrintOutcome {
        if quantity == 0 {
            warn!("quantity is zero, nothing will be sent");
        }

        let outcome = match &settings.transport {
            Transport::Network => self.print_network(settings, payload, quantity),
            Transport::Usb => self.print_queue(settings, payload, quantity),
            Transport::File => self.export_file(payload, quantity),
            Transport::Unknown(name) => {
                PrintOutcome::error(format!("Unknown connection type: {name}"))
            }
        };

        if outcome.is_success() {
            info!(message = %outcome.message, "dispatch complete");
        } else {
            warn!(message = %outcome.message, "dispatch failed");
        }
        outcome
    }

    /// Check that the configured printer can be reached, without printing.
    #[instrument(skip(self, settings), fields(transport = %settings.transport))]
    pub fn test_connection(&self, settings: &PrinterSettings) -> PrintOutcome {
        match &settings.transport {
            Transport::Network => {
                let Some(ip) = settings.address() else {
                    return PrintOutcome::error("IP address not configured");
                };
                let result = resolve_printer_addr(ip, settings.port)
                    .and_then(|addr| probe(addr, self.config.timeouts.probe).map(|()| addr));
                match result {
                    Ok(addr) => PrintOutcome::success(format!("Connected to {addr}")),
                    Err(e) => {
                        warn!(error = %e, "connection test failed");
                        PrintOutcome::error(format!("Connection failed: {e}"))
                    }
                }
            }
            Transport::Usb => {
                PrintOutcome::info("USB connection not tested - try printing a label")
            }
            Transport::File => PrintOutcome::success("File export mode - no connection needed"),
            Transport::Unknown(name) => {
                PrintOutcome::error(format!("Unknown connection type: {name}"))
            }
        }
    }

    fn print_network(&self, settings: &PrinterSettings, payload: &str, quantity: u32) -> PrintOutcome {
        let Some(ip) = settings.address() else {
            return PrintOutcome::error("IP address not configured");
        };

        // An `ip` may carry its own `:port`; messages name the address actually used.
        let addr = match resolve_printer_addr(ip, settings.port) {
            Ok(addr) => addr,
            Err(e) => return PrintOutcome::error(network_failure_message(&e, settings.port)),
        };

        let timeouts = &self.config.timeouts;
        let result = retry_op(&self.config.retry, || {
            TcpPrinter::connect(addr, timeouts.connect, timeouts.write)
        })
        .and_then(|mut printer| send_copies(&mut printer, payload.as_bytes(), quantity));

        match result {
            Ok(_) => PrintOutcome::success(format!("{quantity} label(s) sent to printer at {addr}")),
            Err(e) => PrintOutcome::error(network_failure_message(&e, addr.port())),
        }
    }

    fn print_queue(&self, settings: &PrinterSettings, payload: &str, quantity: u32) -> PrintOutcome {
        let name = settings.printer_name.as_str();
        let mut printer = QueuePrinter::new(self.queue.as_ref(), name);

        match send_copies(&mut printer, payload.as_bytes(), quantity) {
            Ok(_) => PrintOutcome::success(format!("{quantity} label(s) sent to {name}")),
            Err(e) => PrintOutcome::error(queue_failure_message(&e)),
        }
    }

    fn export_file(&self, payload: &str, quantity: u32) -> PrintOutcome {
        let now = Local::now().naive_local();
        match export_labels(&self.config.export_dir, payload, quantity, now) {
            Ok(path) => {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut outcome = PrintOutcome::success(format!("ZPL exported to {filename}"));
                outcome.filename = Some(filename);
                outcome.zpl_code = Some(payload.to_string());
                outcome
            }
            Err(e) => PrintOutcome::error(format!("File export error: {e}")),
        }
    }
}

/// User guidance for a failed network print.
///
/// Timeouts point at the address, refusals at the printer itself.
pub fn network_failure_message(error: &PrintError, port: u16) -> String {
    if error.is_timeout() {
        "Connection timeout - check printer IP and network".to_string()
    } else if error.is_refused() {
        format!("Connection refused - check printer is online and port {port} is open")
    } else {
        format!("Network error: {error}")
    }
}

/// User guidance for a failed print-queue submission.
pub fn queue_failure_message(error: &PrintError) -> String {
    match error {
        PrintError::QueueCommandNotFound { program, .. } => format!(
            "Print command '{program}' not found - check that printing is set up on this computer"
        ),
        PrintError::QueueRejected { queue, stderr, .. } if stderr.is_empty() => {
            format!("Print failed: queue '{queue}' rejected the job")
        }
        PrintError::QueueRejected { stderr, .. } => format!("Print failed: {stderr}"),
        PrintError::UnsupportedPlatform(os) => format!("Unsupported operating system: {os}"),
        other => format!("USB print error: {other}"),
    }
}
