//! HTTP routes.
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | `/` | GET | product selection page |
//! | `/config` | GET | printer configuration page |
//! | `/api/product/{sku}` | GET | product details |
//! | `/api/generate-zpl` | POST | render a label |
//! | `/api/print` | POST | dispatch a rendered label |
//! | `/api/config/printer` | GET, POST | read or update the printer configuration |
//! | `/api/test-connection` | POST | check the configured printer |

mod labels;
mod pages;
mod printer;
mod products;

use axum::Router;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use zpl_labeler_print_client::PrintStatus;

use crate::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(products::router())
        .merge(labels::router())
        .merge(printer::router())
}

// ── Response envelope ───────────────────────────────────────────────────

/// `{"status": "success", "message"?: ..., ...body}`
#[derive(Debug, Serialize)]
struct Success<T> {
    status: PrintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(flatten)]
    body: T,
}

impl<T> Success<T> {
    fn new(body: T) -> Self {
        Self {
            status: PrintStatus::Success,
            message: None,
            body,
        }
    }

    fn with_message(message: &'static str, body: T) -> Self {
        Self {
            status: PrintStatus::Success,
            message: Some(message),
            body,
        }
    }
}

// ── Lenient request fields ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

/// Accept `3`, `"3"`, or `null` for an optional integer field.
fn lenient_int<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrText>::deserialize(de)? {
        None => Ok(None),
        Some(IntOrText::Int(n)) => Ok(Some(n)),
        Some(IntOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: {s:?}"))),
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
