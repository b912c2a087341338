//! Printer transport selection and connection parameters.

use std::fmt;
use std::str::FromStr;

use crate::addr::DEFAULT_PORT;

/// Queue name used when none is configured.
pub const DEFAULT_QUEUE_NAME: &str = "Zebra_GK420d";

/// How a rendered label reaches the printer.
///
/// Unrecognized names are kept as [`Transport::Unknown`] so the dispatcher
/// can report them instead of failing at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Transport {
    /// Raw TCP socket (port 9100).
    Network,
    /// Host OS print queue in raw mode.
    Usb,
    /// Write to a `.zpl` file instead of printing.
    File,
    /// Any other value.
    Unknown(String),
}

impl Transport {
    /// Wire name of the transport.
    pub fn as_str(&self) -> &str {
        match self {
            Transport::Network => "network",
            Transport::Usb => "usb",
            Transport::File => "file",
            Transport::Unknown(s) => s,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Transport::from(s.to_string()))
    }
}

impl From<String> for Transport {
    fn from(s: String) -> Self {
        match s.as_str() {
            "network" => Transport::Network,
            "usb" => Transport::Usb,
            "file" => Transport::File,
            _ => Transport::Unknown(s),
        }
    }
}

impl From<Transport> for String {
    fn from(t: Transport) -> Self {
        match t {
            Transport::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Connection parameters for the active printer.
///
/// Treated as an immutable value: changes produce a new `PrinterSettings`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrinterSettings {
    /// Selected transport.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub transport: Transport,
    /// Printer IP address or hostname (network transport).
    pub ip: Option<String>,
    /// Printer TCP port (network transport).
    pub port: u16,
    /// Host print queue name (usb transport).
    pub printer_name: String,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            transport: Transport::File,
            ip: None,
            port: DEFAULT_PORT,
            printer_name: DEFAULT_QUEUE_NAME.to_string(),
        }
    }
}

impl PrinterSettings {
    /// The configured address, if it is present and not blank.
    pub fn address(&self) -> Option<&str> {
        self.ip.as_deref().map(str::trim).filter(|ip| !ip.is_empty())
    }
}
