use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use sigil_auth::JwtValidator;

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn JwtValidator>,
}

/// Bearer-token gate for the protected route subtree.
///
/// Any missing, malformed, tampered or expired token yields the same 401
/// response; the rejection reason goes to the server log only.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return ApiError::Unauthenticated.into_response();
    };

    let claims = match state.validator.validate(token, Utc::now()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            return ApiError::Unauthenticated.into_response();
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(
        claims.sub,
        claims.name,
        claims.roles,
    ));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}
