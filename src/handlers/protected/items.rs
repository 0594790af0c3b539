use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use crate::database::models::{Item, ItemDetail, ItemDocument};
use crate::error::{ApiError, ApiResult};
use crate::services::{ItemPage, ListParams};
use crate::state::AppState;
use crate::types::Identity;

/// GET /items - paginated search, summaries only
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> ApiResult<ItemPage> {
    Ok(Json(state.items.list(params, &identity).await?))
}

/// GET /items/:id - full document projection
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<ItemDetail> {
    Ok(Json(state.items.get(id, &identity).await?))
}

/// POST /items - admin only; keys outside the item shape are dropped
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(item), _): WithRejection<Json<Item>, ApiError>,
) -> ApiResult<Value> {
    let id = state.items.create(item, &identity).await?;
    Ok(Json(json!({ "id": id, "status": "ok" })))
}

/// PUT /items/:id - admin only, replaces the whole document
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(document), _): WithRejection<Json<ItemDocument>, ApiError>,
) -> ApiResult<Value> {
    state.items.update(id, document, &identity).await?;
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /items/:id - admin only
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Value> {
    state.items.delete(id, &identity).await?;
    Ok(Json(json!({ "ok": true })))
}
