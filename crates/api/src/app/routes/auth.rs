use std::sync::Arc;

use axum::{Extension, Json, response::IntoResponse};

use sigil_auth::{build_claims, verify_and_load_roles};

use crate::app::dto::LoginRequest;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// POST /auth/login - Exchange credentials for a signed bearer token.
///
/// Unknown login name and wrong password produce byte-identical rejections.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let verified = verify_and_load_roles(services.users.as_ref(), &body.email, &body.password)?;

    let claims = build_claims(&verified.principal, verified.roles);
    let signed = services.issuer.issue(&claims)?;

    Ok(Json(serde_json::json!({
        "token": signed.token,
        "expiry": signed.expires_at.to_rfc3339(),
    })))
}

/// GET /auth/me - Identity of the authenticated caller, as the token states it.
pub async fn me(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal_id": principal.principal_id().to_string(),
        "name": principal.display_name(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
