use axum::{extract::State, Form, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::Role;

/// OAuth2 password-flow form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// POST /login - exchange form credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, ApiError>,
) -> ApiResult<LoginResponse> {
    let issued = state
        .auth
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        token_type: "bearer",
        role: issued.role,
    }))
}

/// POST /register - create a plain user account
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<Value> {
    state
        .auth
        .register(&payload.username, &payload.password)
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}
