use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use zpl_labeler_print_client::{PrintOutcome, PrinterSettings, Transport};

use super::{Success, double_option, lenient_int};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/print", post(print))
        .route("/api/config/printer", get(get_config).post(update_config))
        .route("/api/test-connection", post(test_connection))
}

// ── Printing ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PrintRequest {
    #[serde(default)]
    zpl_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    quantity: Option<i64>,
}

/// Requested quantity as a copy count. Negative values mean no copies.
fn copy_count(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

/// POST /api/print
///
/// The dispatch outcome is returned as-is with HTTP 200, including failures.
async fn print(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PrintRequest>,
) -> ApiResult<Json<PrintOutcome>> {
    let zpl = req
        .zpl_code
        .filter(|z| !z.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No ZPL code provided".into()))?;
    let copies = copy_count(req.quantity.unwrap_or(1));

    let settings = state.printer.snapshot();
    let dispatcher = Arc::clone(&state.dispatcher);
    let outcome =
        tokio::task::spawn_blocking(move || dispatcher.dispatch(&settings, &zpl, copies)).await?;
    Ok(Json(outcome))
}

/// POST /api/test-connection
async fn test_connection(State(state): State<AppState>) -> ApiResult<Json<PrintOutcome>> {
    let settings = state.printer.snapshot();
    let dispatcher = Arc::clone(&state.dispatcher);
    let outcome =
        tokio::task::spawn_blocking(move || dispatcher.test_connection(&settings)).await?;
    Ok(Json(outcome))
}

// ── Configuration ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ConfigBody {
    config: PrinterSettings,
}

/// Partial update: absent fields keep their value, `"ip": null` clears the
/// address.
#[derive(Debug, Deserialize)]
struct ConfigUpdate {
    #[serde(rename = "type", default)]
    transport: Option<Transport>,
    #[serde(default, deserialize_with = "double_option")]
    ip: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_int")]
    port: Option<i64>,
    #[serde(default)]
    printer_name: Option<String>,
}

/// GET /api/config/printer
async fn get_config(State(state): State<AppState>) -> Json<Success<ConfigBody>> {
    let config = PrinterSettings::clone(&state.printer.snapshot());
    Json(Success::new(ConfigBody { config }))
}

/// POST /api/config/printer
async fn update_config(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<ConfigUpdate>,
) -> ApiResult<Json<Success<ConfigBody>>> {
    let port = update
        .port
        .map(|p| u16::try_from(p).map_err(|_| ApiError::BadRequest(format!("Invalid port: {p}"))))
        .transpose()?;

    let config = state.printer.update(|current| {
        let mut next = current.clone();
        if let Some(transport) = update.transport {
            next.transport = transport;
        }
        if let Some(ip) = update.ip {
            next.ip = ip.filter(|s| !s.trim().is_empty());
        }
        if let Some(port) = port {
            next.port = port;
        }
        if let Some(name) = update.printer_name {
            next.printer_name = name;
        }
        next
    });

    tracing::info!(
        transport = %config.transport,
        ip = ?config.ip,
        port = config.port,
        printer_name = %config.printer_name,
        "printer configuration updated"
    );

    Ok(Json(Success::with_message(
        "Configuration updated",
        ConfigBody {
            config: PrinterSettings::clone(&config),
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_count_clamps() {
        assert_eq!(copy_count(3), 3);
        assert_eq!(copy_count(0), 0);
        assert_eq!(copy_count(-5), 0);
        assert_eq!(copy_count(i64::MAX), u32::MAX);
    }

    #[test]
    fn config_update_distinguishes_null_ip() {
        let cleared: ConfigUpdate = serde_json::from_str(r#"{"ip": null}"#).unwrap();
        assert_eq!(cleared.ip, Some(None));

        let untouched: ConfigUpdate = serde_json::from_str(r#"{"port": "6101"}"#).unwrap();
        assert_eq!(untouched.ip, None);
        assert_eq!(untouched.port, Some(6101));
        assert_eq!(untouched.transport, None);
    }
}
