//! Credential verification against the user directory.

use thiserror::Error;

use crate::directory::{DirectoryError, UserDirectory};
use crate::principal::Principal;
use crate::roles::RoleName;

/// Why a credential pair was rejected.
///
/// The split between unknown login and wrong secret exists for server-side
/// logging only; the HTTP boundary collapses both into one uniform response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("login name is not registered")]
    UnknownLogin,

    #[error("secret does not match")]
    InvalidSecret,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// A verified principal together with the roles held at check time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredentials {
    pub principal: Principal,
    pub roles: Vec<RoleName>,
}

/// Check a presented login name/secret pair against the user directory.
///
/// Read-only: no lockouts, no attempt counters, no side effects. The secret
/// itself is never logged.
pub fn verify_credentials(
    directory: &dyn UserDirectory,
    login_name: &str,
    secret: &str,
) -> Result<Principal, CredentialError> {
    let Some(principal) = directory.find_by_login_name(login_name)? else {
        tracing::debug!("credential check failed: unknown login name");
        return Err(CredentialError::UnknownLogin);
    };

    if !directory.verify_secret(&principal, secret)? {
        tracing::debug!(principal_id = %principal.id, "credential check failed: secret mismatch");
        return Err(CredentialError::InvalidSecret);
    }

    Ok(principal)
}

/// Verify a credential pair and load the principal's roles in one step.
///
/// Login is the only flow needing both, and reading the memberships here
/// keeps the claims about to be issued consistent with the directory state
/// at verification time.
pub fn verify_and_load_roles(
    directory: &dyn UserDirectory,
    login_name: &str,
    secret: &str,
) -> Result<VerifiedCredentials, CredentialError> {
    let principal = verify_credentials(directory, login_name, secret)?;
    let roles = directory.roles_of(&principal)?;
    Ok(VerifiedCredentials { principal, roles })
}
