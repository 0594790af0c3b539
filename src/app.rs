use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Assemble the full HTTP surface.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors_layer(config))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        .route("/register", post(public::register))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::items;

    Router::new()
        .route("/items", get(items::list).post(items::create))
        .route("/items/:id", get(items::get).put(items::update).delete(items::delete))
        .route("/admin/items", post(elevated::admin::insert_item))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.security.cors_is_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
