//! Command-line and environment configuration for the server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use zpl_labeler_print_client::{DispatchConfig, PrinterSettings, RetryConfig, Transport};

/// Queue name of the Zebra GK420d as installed by CUPS.
pub const DEFAULT_PRINTER_NAME: &str = "Zebra_Technologies_ZTC_GK420d";

/// Server settings. Every flag can also be set through its environment
/// variable.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "zpl-labeler",
    version,
    about = "Web interface for rendering product labels and printing them on Zebra printers"
)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "ZPL_LABELER_BIND", default_value = "0.0.0.0:5001")]
    pub bind: SocketAddr,

    /// Product catalog (YAML).
    #[arg(long, env = "ZPL_LABELER_CATALOG", default_value = "products.yaml")]
    pub catalog: PathBuf,

    /// ZPL label template.
    #[arg(
        long,
        env = "ZPL_LABELER_TEMPLATE",
        default_value = "zpl_templates/type_qr_57x32.zpl"
    )]
    pub template: PathBuf,

    /// Directory that receives exported `.zpl` files.
    #[arg(long, env = "ZPL_LABELER_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Initial printer transport: network, usb, or file.
    #[arg(long, env = "ZPL_LABELER_TRANSPORT", default_value = "usb")]
    pub transport: String,

    /// Initial printer IP address or hostname.
    #[arg(long, env = "ZPL_LABELER_PRINTER_IP")]
    pub printer_ip: Option<String>,

    /// Initial printer TCP port.
    #[arg(long, env = "ZPL_LABELER_PRINTER_PORT", default_value_t = 9100)]
    pub printer_port: u16,

    /// Initial print queue name.
    #[arg(long, env = "ZPL_LABELER_PRINTER_NAME", default_value = DEFAULT_PRINTER_NAME)]
    pub printer_name: String,

    /// Connection attempts per network print job (1 disables retry).
    #[arg(long, env = "ZPL_LABELER_CONNECT_ATTEMPTS", default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..=10))]
    pub connect_attempts: u32,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "ZPL_LABELER_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Printer settings the server starts with.
    pub fn initial_printer_settings(&self) -> PrinterSettings {
        PrinterSettings {
            transport: Transport::from(self.transport.clone()),
            ip: self.printer_ip.clone(),
            port: self.printer_port,
            printer_name: self.printer_name.clone(),
        }
    }

    /// Dispatcher configuration derived from the flags.
    pub fn dispatch_config(&self) -> DispatchConfig {
        let mut config = DispatchConfig::default();
        config.export_dir = self.export_dir.clone();
        config.retry = RetryConfig::with_attempts(self.connect_attempts);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::try_parse_from(["zpl-labeler"]).unwrap();
        assert_eq!(config.bind.port(), 5001);
        assert_eq!(config.catalog, PathBuf::from("products.yaml"));

        let settings = config.initial_printer_settings();
        assert_eq!(settings.transport, Transport::Usb);
        assert_eq!(settings.ip, None);
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.printer_name, DEFAULT_PRINTER_NAME);
        assert_eq!(config.dispatch_config().retry.max_attempts, 1);
    }

    #[test]
    fn printer_flags() {
        let config = ServerConfig::try_parse_from([
            "zpl-labeler",
            "--transport",
            "network",
            "--printer-ip",
            "192.168.1.100",
            "--printer-port",
            "6101",
            "--connect-attempts",
            "3",
        ])
        .unwrap();
        let settings = config.initial_printer_settings();
        assert_eq!(settings.transport, Transport::Network);
        assert_eq!(settings.ip.as_deref(), Some("192.168.1.100"));
        assert_eq!(settings.port, 6101);
        assert_eq!(config.dispatch_config().retry.max_attempts, 3);
    }

    #[test]
    fn connect_attempts_out_of_range_rejected() {
        assert!(ServerConfig::try_parse_from(["zpl-labeler", "--connect-attempts", "0"]).is_err());
    }
}
