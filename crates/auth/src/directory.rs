//! Contracts for durable identity storage.
//!
//! The core talks to user and role storage exclusively through these traits;
//! `sigil-directory` ships the in-memory reference implementation.

use std::sync::Arc;

use thiserror::Error;

use crate::principal::{NewPrincipal, Principal};
use crate::roles::{Role, RoleName};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("login name '{0}' is already registered")]
    DuplicateLoginName(String),

    #[error("role '{0}' already exists")]
    DuplicateRoleName(String),

    #[error("role '{0}' is already assigned")]
    AlreadyInRole(String),

    #[error("principal is not registered")]
    UnknownPrincipal,

    #[error("directory storage failure: {0}")]
    Storage(String),
}

impl DirectoryError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Store of principals together with their credentials and role memberships.
pub trait UserDirectory: Send + Sync {
    /// Look up a principal by unique login name.
    fn find_by_login_name(&self, login_name: &str) -> Result<Option<Principal>, DirectoryError>;

    /// Register a principal with an opaque secret.
    fn create(&self, principal: NewPrincipal, secret: &str) -> Result<Principal, DirectoryError>;

    /// Check a presented secret against the stored credential.
    fn verify_secret(&self, principal: &Principal, secret: &str) -> Result<bool, DirectoryError>;

    /// Role names held by the principal, in assignment order.
    fn roles_of(&self, principal: &Principal) -> Result<Vec<RoleName>, DirectoryError>;

    /// Grant a role. A role already held reports [`DirectoryError::AlreadyInRole`].
    fn add_to_role(&self, principal: &Principal, role: &RoleName) -> Result<(), DirectoryError>;
}

/// Store of roles, unique by exact name.
pub trait RoleDirectory: Send + Sync {
    fn find_by_name(&self, name: &str) -> Result<Option<Role>, DirectoryError>;

    /// Create a role. A name already taken reports [`DirectoryError::DuplicateRoleName`].
    fn create(&self, name: &str) -> Result<Role, DirectoryError>;
}

impl<S> UserDirectory for Arc<S>
where
    S: UserDirectory + ?Sized,
{
    fn find_by_login_name(&self, login_name: &str) -> Result<Option<Principal>, DirectoryError> {
        (**self).find_by_login_name(login_name)
    }

    fn create(&self, principal: NewPrincipal, secret: &str) -> Result<Principal, DirectoryError> {
        (**self).create(principal, secret)
    }

    fn verify_secret(&self, principal: &Principal, secret: &str) -> Result<bool, DirectoryError> {
        (**self).verify_secret(principal, secret)
    }

    fn roles_of(&self, principal: &Principal) -> Result<Vec<RoleName>, DirectoryError> {
        (**self).roles_of(principal)
    }

    fn add_to_role(&self, principal: &Principal, role: &RoleName) -> Result<(), DirectoryError> {
        (**self).add_to_role(principal, role)
    }
}

impl<S> RoleDirectory for Arc<S>
where
    S: RoleDirectory + ?Sized,
{
    fn find_by_name(&self, name: &str) -> Result<Option<Role>, DirectoryError> {
        (**self).find_by_name(name)
    }

    fn create(&self, name: &str) -> Result<Role, DirectoryError> {
        (**self).create(name)
    }
}
