//! Host print-queue submission.
//!
//! [`RawQueue`] is the single "submit bytes to a named print queue"
//! capability used by the USB transport and the PDF CLI. Each host platform
//! family gets one backend, chosen once by [`host_queue()`]:
//!
//! | Platform | Raw bytes | Files | Listing |
//! |---|---|---|---|
//! | Linux / BSD | `lp -d Q -o raw` | `lp [-d Q] FILE` | `lpstat -p` |
//! | macOS | `lpr -P Q -o raw` | `lpr [-P Q] FILE` | `lpstat -p` |
//! | Windows | write to `\\localhost\Q` | `print [/D:Q] FILE` | `wmic printer get name` |
//!
//! Queue names are never validated up front; a missing queue surfaces as a
//! submission failure.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::{PrintError, Printer};

/// Submit data to the operating system's print queues.
pub trait RawQueue: Send + Sync {
    /// Short backend name for logs (e.g. `"lp"`).
    fn backend(&self) -> &'static str;

    /// Send `data` unmodified to the raw queue `queue` as one job.
    fn submit_raw(&self, queue: &str, data: &[u8]) -> Result<(), PrintError>;

    /// Print a document file through the driver of `queue` (or the default
    /// printer when `None`).
    fn submit_file(&self, queue: Option<&str>, path: &Path) -> Result<(), PrintError>;

    /// Human-readable listing of the printers known to the host.
    fn list_printers(&self) -> Result<String, PrintError>;
}

/// Pick the backend for the platform this binary was built for.
pub fn host_queue() -> Box<dyn RawQueue> {
    if cfg!(target_os = "macos") {
        Box::new(CupsQueue::lpr())
    } else if cfg!(target_os = "windows") {
        Box::new(WindowsQueue)
    } else if cfg!(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    )) {
        Box::new(CupsQueue::lp())
    } else {
        Box::new(UnsupportedQueue::new(std::env::consts::OS))
    }
}

/// A named queue on a [`RawQueue`] backend, usable as a [`Printer`].
///
/// Every `send_raw` call is submitted as its own print job.
pub struct QueuePrinter<'a> {
    queue: &'a dyn RawQueue,
    name: &'a str,
}

impl<'a> QueuePrinter<'a> {
    /// Target queue `name` on `queue`.
    pub fn new(queue: &'a dyn RawQueue, name: &'a str) -> Self {
        Self { queue, name }
    }
}

impl Printer for QueuePrinter<'_> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.queue.submit_raw(self.name, data)
    }
}

// ── CUPS (lp / lpr) ─────────────────────────────────────────────────────

/// Which CUPS front-end syntax to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CupsFlavor {
    /// System V style: `lp -d QUEUE`.
    Lp,
    /// BSD style: `lpr -P QUEUE`.
    Lpr,
}

/// CUPS backend driving `lp` or `lpr`.
#[derive(Debug, Clone)]
pub struct CupsQueue {
    flavor: CupsFlavor,
    program: String,
    lister: String,
}

impl CupsQueue {
    /// System V `lp` syntax (Linux, BSD).
    pub fn lp() -> Self {
        Self {
            flavor: CupsFlavor::Lp,
            program: "lp".into(),
            lister: "lpstat".into(),
        }
    }

    /// BSD `lpr` syntax (macOS).
    pub fn lpr() -> Self {
        Self {
            flavor: CupsFlavor::Lpr,
            program: "lpr".into(),
            lister: "lpstat".into(),
        }
    }

    /// Override the submission program (keeps the flavor's argument syntax).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Override the listing program.
    pub fn with_lister(mut self, lister: impl Into<String>) -> Self {
        self.lister = lister.into();
        self
    }

    fn queue_flag(&self) -> &'static str {
        match self.flavor {
            CupsFlavor::Lp => "-d",
            CupsFlavor::Lpr => "-P",
        }
    }

    fn raw_args<'a>(&self, queue: &'a str) -> [&'a str; 4] {
        [self.queue_flag(), queue, "-o", "raw"]
    }
}

impl RawQueue for CupsQueue {
    fn backend(&self) -> &'static str {
        match self.flavor {
            CupsFlavor::Lp => "lp",
            CupsFlavor::Lpr => "lpr",
        }
    }

    fn submit_raw(&self, queue: &str, data: &[u8]) -> Result<(), PrintError> {
        let output = run(&self.program, &self.raw_args(queue), Some(data))?;
        check_status(queue, &output)
    }

    fn submit_file(&self, queue: Option<&str>, path: &Path) -> Result<(), PrintError> {
        let path = path.to_string_lossy();
        let mut args: Vec<&str> = Vec::with_capacity(3);
        if let Some(q) = queue {
            args.extend([self.queue_flag(), q]);
        }
        args.push(&path);

        let output = run(&self.program, &args, None)?;
        check_status(queue.unwrap_or("default"), &output)
    }

    fn list_printers(&self) -> Result<String, PrintError> {
        let output = run(&self.lister, &["-p"], None)?;
        check_listing(&self.lister, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── Windows ─────────────────────────────────────────────────────────────

/// Windows backend: raw jobs go to the local printer share, files through
/// `print`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsQueue;

impl WindowsQueue {
    fn share_path(queue: &str) -> String {
        format!(r"\\localhost\{queue}")
    }
}

impl RawQueue for WindowsQueue {
    fn backend(&self) -> &'static str {
        "windows-share"
    }

    fn submit_raw(&self, queue: &str, data: &[u8]) -> Result<(), PrintError> {
        let share = Self::share_path(queue);
        let mut port = OpenOptions::new()
            .write(true)
            .open(&share)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => PrintError::QueueRejected {
                    queue: queue.to_string(),
                    code: None,
                    stderr: format!("printer share {share} not found"),
                },
                _ => PrintError::QueueIo(e),
            })?;
        port.write_all(data).map_err(PrintError::QueueIo)?;
        port.flush().map_err(PrintError::QueueIo)
    }

    fn submit_file(&self, queue: Option<&str>, path: &Path) -> Result<(), PrintError> {
        let path = path.to_string_lossy();
        let device = queue.map(|q| format!("/D:{q}"));
        let mut args: Vec<&str> = vec!["/C", "print"];
        if let Some(d) = device.as_deref() {
            args.push(d);
        }
        args.push(&path);

        let output = run("cmd", &args, None)?;
        check_status(queue.unwrap_or("default"), &output)
    }

    fn list_printers(&self) -> Result<String, PrintError> {
        let output = run("wmic", &["printer", "get", "name"], None)?;
        check_listing("wmic", &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── Unsupported ─────────────────────────────────────────────────────────

/// Backend for platforms with no known print command. Every call fails.
#[derive(Debug, Clone)]
pub struct UnsupportedQueue {
    os: String,
}

impl UnsupportedQueue {
    /// Create a backend that reports `os` as unsupported.
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl RawQueue for UnsupportedQueue {
    fn backend(&self) -> &'static str {
        "unsupported"
    }

    fn submit_raw(&self, _queue: &str, _data: &[u8]) -> Result<(), PrintError> {
        Err(PrintError::UnsupportedPlatform(self.os.clone()))
    }

    fn submit_file(&self, _queue: Option<&str>, _path: &Path) -> Result<(), PrintError> {
        Err(PrintError::UnsupportedPlatform(self.os.clone()))
    }

    fn list_printers(&self) -> Result<String, PrintError> {
        Err(PrintError::UnsupportedPlatform(self.os.clone()))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Run `program`, optionally feeding `stdin`, and collect its output.
fn run(program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output, PrintError> {
    debug!(program, ?args, stdin_len = stdin.map(<[u8]>::len), "running print command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PrintError::QueueCommandNotFound {
                program: program.to_string(),
                source: e,
            },
            _ => PrintError::QueueIo(e),
        })?;

    if let (Some(data), Some(mut pipe)) = (stdin, child.stdin.take()) {
        // A command that exits without reading its input closes the pipe
        // early; the exit status is what decides success.
        match pipe.write_all(data) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(PrintError::QueueIo(e)),
        }
    }

    child.wait_with_output().map_err(PrintError::QueueIo)
}

fn check_status(queue: &str, output: &Output) -> Result<(), PrintError> {
    if output.status.success() {
        return Ok(());
    }
    Err(PrintError::QueueRejected {
        queue: queue.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

fn check_listing(program: &str, output: &Output) -> Result<(), PrintError> {
    if output.status.success() {
        return Ok(());
    }
    Err(PrintError::ListPrintersFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
