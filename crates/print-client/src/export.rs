//! File export: write labels to a `.zpl` file instead of a printer.
//!
//! Each copy is preceded by a `# Label i/q` marker line and followed by a
//! blank line, so the file can be reviewed by eye or sent on later.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::warn;

use crate::PrintError;

/// Give up looking for a free file name after this many suffixes.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Base file name for an export made at `now`: `label_YYYYMMDD_HHMMSS.zpl`.
pub fn label_file_name(now: NaiveDateTime) -> String {
    format!("label_{}.zpl", now.format("%Y%m%d_%H%M%S"))
}

/// Write `quantity` marked copies of `payload` to `out`.
pub fn write_copies<W: Write>(out: &mut W, payload: &str, quantity: u32) -> io::Result<()> {
    for i in 1..=quantity {
        writeln!(out, "# Label {i}/{quantity}")?;
        out.write_all(payload.as_bytes())?;
        out.write_all(b"\n\n")?;
    }
    out.flush()
}

/// Export `quantity` copies of `payload` into a new file in `dir`.
///
/// The file is named after `now`. If that name is taken (two exports in the
/// same second), `_2`, `_3`, ... is appended rather than overwriting.
/// Returns the path of the created file.
pub fn export_labels(
    dir: &Path,
    payload: &str,
    quantity: u32,
    now: NaiveDateTime,
) -> Result<PathBuf, PrintError> {
    let (path, file) = create_unique(dir, now)?;
    write_export(path, BufWriter::new(file), payload, quantity)
}

/// Write the copies to the freshly created `path`, removing it on failure.
fn write_export<W: Write>(
    path: PathBuf,
    mut out: W,
    payload: &str,
    quantity: u32,
) -> Result<PathBuf, PrintError> {
    match write_copies(&mut out, payload, quantity) {
        Ok(()) => Ok(path),
        Err(source) => {
            drop(out);
            discard_partial(&path);
            Err(PrintError::ExportFailed { path, source })
        }
    }
}

/// Remove a half-written export so only complete files are left behind.
fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "could not remove partial export");
    }
}

fn create_unique(dir: &Path, now: NaiveDateTime) -> Result<(PathBuf, File), PrintError> {
    let stem = format!("label_{}", now.format("%Y%m%d_%H%M%S"));
    let mut path = dir.join(label_file_name(now));

    for n in 2..=MAX_NAME_ATTEMPTS + 1 {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                path = dir.join(format!("{stem}_{n}.zpl"));
            }
            Err(source) => return Err(PrintError::ExportFailed { path, source }),
        }
    }

    Err(PrintError::ExportFailed {
        path,
        source: io::Error::new(io::ErrorKind::AlreadyExists, "no free export file name"),
    })
}
