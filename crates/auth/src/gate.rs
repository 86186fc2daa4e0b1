//! Role-based authorization gate.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use thiserror::Error;

use crate::roles::RoleName;

/// What an operation demands of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Callable with or without a token.
    AllowAnonymous,
    /// A valid token is required; any role set is acceptable.
    Authenticated,
    /// A valid token carrying the given role claim is required.
    RequireRole(RoleName),
}

/// The caller as established by transport-level token validation.
///
/// A missing, tampered or expired token never reaches `Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated { roles: Vec<RoleName> },
}

impl Caller {
    /// Caller carrying the role claims of a validated token.
    pub fn authenticated(roles: Vec<RoleName>) -> Self {
        Self::Authenticated { roles }
    }
}

/// Denied access, split by the HTTP status it must map to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No valid token on an operation that needs one (401).
    #[error("authentication required")]
    Unauthenticated,

    /// Valid token, but the required role claim is missing (403).
    #[error("missing role '{0}'")]
    Forbidden(String),
}

/// Decide whether a caller may run an operation with the given requirement.
///
/// Role names match exactly and case-sensitively; there is no hierarchy and
/// no wildcard.
pub fn evaluate(requirement: &AccessRequirement, caller: &Caller) -> Result<(), Denial> {
    match (requirement, caller) {
        (AccessRequirement::AllowAnonymous, _) => Ok(()),
        (_, Caller::Anonymous) => Err(Denial::Unauthenticated),
        (AccessRequirement::Authenticated, Caller::Authenticated { .. }) => Ok(()),
        (AccessRequirement::RequireRole(required), Caller::Authenticated { roles }) => {
            require_role(roles, required)
        }
    }
}

/// Check a role claim among those held.
pub fn require_role(held: &[RoleName], required: &RoleName) -> Result<(), Denial> {
    if held.iter().any(|role| role == required) {
        Ok(())
    } else {
        Err(Denial::Forbidden(required.as_str().to_string()))
    }
}
