//! `sigil-auth` — credential verification, claims assembly, token issuance
//! and the role-based authorization gate.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod credentials;
pub mod directory;
pub mod gate;
pub mod principal;
pub mod role_store;
pub mod roles;
pub mod token;

pub use claims::{Claim, ClaimSet, JwtClaims, TokenValidationError, build_claims, validate_claims};
pub use credentials::{
    CredentialError, VerifiedCredentials, verify_and_load_roles, verify_credentials,
};
pub use directory::{DirectoryError, RoleDirectory, UserDirectory};
pub use gate::{AccessRequirement, Caller, Denial, evaluate};
pub use principal::{NewPrincipal, Principal, PrincipalId};
pub use role_store::{AssignRoleError, CreateRoleError, assign_role, create_role};
pub use roles::{ADMIN, Role, RoleId, RoleName};
pub use token::{
    Hs256JwtValidator, Hs256TokenIssuer, JwtValidator, SignedToken, SigningSecret, TokenConfig,
    TokenConfigError, TokenDecodeError, TokenError,
};
