//! API-side authorization guard for handlers.
//!
//! Role checks run at the handler boundary, after the bearer middleware has
//! established the principal context, while keeping the gate itself
//! transport-agnostic.

use sigil_auth::{
    RoleName,
    gate::{AccessRequirement, Caller, evaluate},
};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Require a role claim on the current principal before running an operation.
pub fn require_role(principal: &PrincipalContext, role: &RoleName) -> Result<(), ApiError> {
    let caller = Caller::authenticated(principal.roles().to_vec());

    evaluate(&AccessRequirement::RequireRole(role.clone()), &caller).map_err(|denial| {
        tracing::debug!(
            principal_id = %principal.principal_id(),
            error = %denial,
            "authorization denied"
        );
        ApiError::from(denial)
    })
}
