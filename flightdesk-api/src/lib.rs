use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod flights;
pub mod middleware;
pub mod provider_client;
pub mod state;
pub mod worker;

pub use state::{AppState, AuthConfig};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(auth::routes())
        .merge(flights::routes().route_layer(axum::middleware::from_fn(middleware::require_user)))
        .merge(admin::routes().route_layer(axum::middleware::from_fn(middleware::require_admin)))
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::authenticate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
