//! Admin routes for identity management.
//!
//! Every endpoint here demands the administrative role on the caller's
//! token; the bearer middleware has already established who is calling.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use sigil_auth::{ADMIN, NewPrincipal, UserDirectory, role_store};

use crate::app::dto::{AssignRoleRequest, CreateRoleRequest, RegisterUserRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/:email/roles", post(assign_role))
        .route("/roles", post(create_role))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /admin/users - Register a new user
pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<StatusCode, ApiError> {
    authz::require_role(&principal, &ADMIN)?;

    let mut problems = Vec::new();
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        problems.push("email must be a valid address".to_string());
    }
    if body.password.is_empty() {
        problems.push("password must not be empty".to_string());
    }
    if !problems.is_empty() {
        return Err(ApiError::Validation(problems));
    }

    let created = services.users.create(
        NewPrincipal {
            login_name: email.to_string(),
            first_name: body.first_name.trim().to_string(),
            last_name: body.last_name.trim().to_string(),
        },
        &body.password,
    )?;

    tracing::info!(login_name = %created.login_name, "user registered");
    Ok(StatusCode::CREATED)
}

/// POST /admin/roles - Create a role
pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authz::require_role(&principal, &ADMIN)?;

    let role = role_store::create_role(services.roles.as_ref(), &body.name)?;

    tracing::info!(role = %role.name(), "role created");
    Ok(Json(serde_json::json!({
        "id": role.id().to_string(),
        "name": role.name().as_str(),
    })))
}

/// POST /admin/users/:email/roles - Assign a role to a user
pub async fn assign_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(email): Path<String>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<StatusCode, ApiError> {
    authz::require_role(&principal, &ADMIN)?;

    role_store::assign_role(
        services.users.as_ref(),
        services.roles.as_ref(),
        &email,
        &body.role,
    )?;

    tracing::info!(role = %body.role, "role assigned");
    Ok(StatusCode::OK)
}
