//! `print-pdf`: send PDF shipping labels to a Zebra printer through the
//! host's print queue.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use zpl_labeler_print_client::{RawQueue, host_queue, queue_failure_message};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "print-pdf",
    version,
    about = "Print PDF shipping labels to a Zebra GK420d"
)]
struct Cli {
    /// PDF file to print.
    pdf_file: Option<PathBuf>,

    /// Printer name (uses the system default when omitted).
    #[arg(short, long)]
    printer: Option<String>,

    /// List available printers and exit.
    #[arg(short, long)]
    list: bool,
}

const USAGE: &str = "\
Usage:
  print-pdf shipping-labels/label-01.pdf
  print-pdf shipping-labels/label-01.pdf -p Zebra_GK420d
  print-pdf --list  (to see available printers)";

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let queue = host_queue();

    if cli.list {
        return cmd_list(queue.as_ref());
    }

    let Some(pdf) = cli.pdf_file else {
        eprintln!("Error: no PDF file specified\n\n{USAGE}");
        process::exit(1);
    };

    if !cmd_print(queue.as_ref(), &pdf, cli.printer.as_deref()) {
        process::exit(1);
    }
    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_list(queue: &dyn RawQueue) -> Result<()> {
    let listing = queue
        .list_printers()
        .with_context(|| format!("listing printers via {}", queue.backend()))?;
    println!("Available printers:");
    println!("{}", listing.trim_end());
    Ok(())
}

/// Submit `pdf` and report the result. Returns whether the job was accepted.
fn cmd_print(queue: &dyn RawQueue, pdf: &Path, printer: Option<&str>) -> bool {
    if !pdf.exists() {
        eprintln!("Error: PDF file not found: {}", pdf.display());
        return false;
    }

    let name = pdf.file_name().map_or_else(
        || pdf.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    println!("Printing: {name}");
    if let Some(p) = printer {
        println!("   To printer: {p}");
    }

    match queue.submit_file(printer, pdf) {
        Ok(()) => {
            println!("Print job sent successfully!");
            true
        }
        Err(e) => {
            eprintln!("Error: {}", queue_failure_message(&e));
            false
        }
    }
}
