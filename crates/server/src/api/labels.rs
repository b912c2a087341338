use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use zpl_labeler_catalog::{Product, resolve_batch};
use zpl_labeler_template::{Fields, render_file};

use super::{Success, lenient_int};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/api/generate-zpl", post(generate_zpl))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    best_before: Option<String>,
    #[serde(default)]
    batch: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    quantity: Option<i64>,
}

#[derive(Debug, Serialize)]
struct LabelBody {
    zpl_code: String,
    quantity: i64,
    label_type: String,
}

/// Template fields for one label.
fn label_fields(product: &Product, best_before: String, batch: String) -> Fields<'static> {
    Fields::from([
        ("product_name", product.name.clone()),
        ("weight", product.weight.clone()),
        ("best_before", best_before),
        ("batch", batch),
        ("disposal", product.disposal.clone()),
        ("qr_url", product.qr_url.clone()),
        ("producer", product.producer.clone()),
        ("importer", product.importer.clone()),
        ("origin", product.origin.clone()),
    ])
}

/// POST /api/generate-zpl
async fn generate_zpl(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> ApiResult<Json<Success<LabelBody>>> {
    let sku = req.sku.unwrap_or_default();
    let product = state
        .catalog
        .get(&sku)
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    let best_before = req
        .best_before
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing field: best_before".into()))?;
    let batch = resolve_batch(&sku, product, req.batch.as_deref());
    let quantity = req.quantity.unwrap_or(1);

    let fields = label_fields(product, best_before, batch);
    let template = Arc::clone(&state.template_path);
    let zpl_code = tokio::task::spawn_blocking(move || render_file(&template, &fields)).await??;

    tracing::info!(%sku, quantity, bytes = zpl_code.len(), "label rendered");

    Ok(Json(Success::new(LabelBody {
        zpl_code,
        quantity,
        label_type: product.label_type.clone(),
    })))
}
