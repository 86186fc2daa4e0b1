use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use sigil_auth::{
    AssignRoleError, CreateRoleError, CredentialError, Denial, DirectoryError, TokenError,
};

/// Boundary error for every handler: component errors convert in, HTTP out.
///
/// Internal detail never leaves the process; clients get a stable code and a
/// fixed message while the specifics go to the server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("resource not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Validation(messages) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "validation_error",
                    "messages": messages,
                })),
            )
                .into_response(),
            ApiError::NotFound => {
                json_error(StatusCode::NOT_FOUND, "not_found", "resource not found")
            }
            ApiError::InvalidCredentials => json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid login name or password",
            ),
            ApiError::Conflict(message) => json_error(StatusCode::CONFLICT, "conflict", message),
            ApiError::Unauthenticated => json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "authentication required",
            ),
            ApiError::Forbidden => json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "insufficient permissions",
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateLoginName(name) => {
                ApiError::Conflict(format!("login name '{name}' is already registered"))
            }
            DirectoryError::DuplicateRoleName(name) => {
                ApiError::Conflict(format!("role '{name}' already exists"))
            }
            DirectoryError::AlreadyInRole(role) => {
                ApiError::Conflict(format!("role '{role}' is already assigned"))
            }
            DirectoryError::UnknownPrincipal => {
                ApiError::Internal("principal record missing from directory".to_string())
            }
            DirectoryError::Storage(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            // Uniform rejection: the classification stays server-side.
            CredentialError::UnknownLogin | CredentialError::InvalidSecret => {
                ApiError::InvalidCredentials
            }
            CredentialError::Directory(inner) => ApiError::from(inner),
        }
    }
}

impl From<CreateRoleError> for ApiError {
    fn from(err: CreateRoleError) -> Self {
        match err {
            CreateRoleError::EmptyName => {
                ApiError::Validation(vec!["role name must not be empty".to_string()])
            }
            CreateRoleError::DuplicateName(name) => {
                ApiError::Conflict(format!("role '{name}' already exists"))
            }
            CreateRoleError::Directory(inner) => ApiError::from(inner),
        }
    }
}

impl From<AssignRoleError> for ApiError {
    fn from(err: AssignRoleError) -> Self {
        match err {
            AssignRoleError::PrincipalNotFound | AssignRoleError::RoleNotFound => {
                ApiError::NotFound
            }
            AssignRoleError::AlreadyAssigned => {
                ApiError::Conflict("role is already assigned".to_string())
            }
            AssignRoleError::Directory(inner) => ApiError::from(inner),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => ApiError::Unauthenticated,
            Denial::Forbidden(_) => ApiError::Forbidden,
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
