//! Web service for rendering and printing ZPL product labels.
//!
//! Products come from a YAML catalog, labels are rendered from a ZPL
//! template, and printing goes through a
//! [`Dispatcher`](zpl_labeler_print_client::Dispatcher) configured at runtime
//! via the API.

mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ApiJson, ApiResult};
pub use logging::init_logger;
pub use state::{AppState, PrinterSettingsStore};

/// Build the application router with middleware and state applied.
pub fn build_router(state: AppState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
