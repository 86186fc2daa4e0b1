use axum::{Router, routing::get};

pub mod admin;
pub mod auth;
pub mod system;

/// Router for all bearer-token protected endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/admin", admin::router())
}
