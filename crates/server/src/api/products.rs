use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use zpl_labeler_catalog::Product;

use super::Success;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/api/product/{sku}", get(get_product))
}

#[derive(Debug, Serialize)]
struct ProductBody {
    product: Product,
}

/// GET /api/product/{sku}
async fn get_product(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> ApiResult<Json<Success<ProductBody>>> {
    let product = state
        .catalog
        .get(&sku)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(Json(Success::new(ProductBody { product })))
}
