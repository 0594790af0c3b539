use axum::{extract::State, Extension, Json};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use crate::database::models::ItemDocument;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::Identity;

/// POST /admin/items - insert any JSON object as a document
pub async fn insert_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(document), _): WithRejection<Json<ItemDocument>, ApiError>,
) -> ApiResult<Value> {
    state.items.insert_document(document, &identity).await?;
    Ok(Json(json!({ "status": "inserted" })))
}
