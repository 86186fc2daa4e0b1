use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::principal::{Principal, PrincipalId};
use crate::roles::RoleName;

/// A single typed claim within a claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Subject identifier of the principal the token speaks for.
    Subject(PrincipalId),
    /// Display name (the login name).
    DisplayName(String),
    /// Fresh random token identifier.
    TokenId(Uuid),
    /// One role membership.
    Role(RoleName),
}

/// Ordered, immutable set of claims assembled for one token issuance.
///
/// Always carries exactly one subject, one display name and one token id,
/// followed by one role claim per held role in assignment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    subject: PrincipalId,
    display_name: String,
    token_id: Uuid,
    roles: Vec<RoleName>,
}

impl ClaimSet {
    pub fn subject(&self) -> PrincipalId {
        self.subject
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn token_id(&self) -> Uuid {
        self.token_id
    }

    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }

    /// Claims in canonical order: subject, display name, token id, then roles.
    pub fn claims(&self) -> impl Iterator<Item = Claim> + '_ {
        [
            Claim::Subject(self.subject),
            Claim::DisplayName(self.display_name.clone()),
            Claim::TokenId(self.token_id),
        ]
        .into_iter()
        .chain(self.roles.iter().cloned().map(Claim::Role))
    }
}

/// Assemble the claim set for a verified principal.
///
/// Deterministic except for the token id, which is drawn fresh from the
/// operating system CSPRNG on every call. Roles are carried through in the
/// order given; callers must not pass duplicates.
pub fn build_claims(principal: &Principal, roles: Vec<RoleName>) -> ClaimSet {
    ClaimSet {
        subject: principal.id,
        display_name: principal.login_name.clone(),
        token_id: Uuid::new_v4(),
        roles,
    }
}

/// Claims as they travel inside the signed token.
///
/// `exp` is seconds since the Unix epoch, the shape JWT validation expects.
/// Audience always equals issuer; tokens are consumed by the service that
/// minted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: PrincipalId,
    pub name: String,
    pub jti: Uuid,
    pub roles: Vec<RoleName>,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
}

impl JwtClaims {
    /// Expiry as a timestamp, when representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token expiry is not a representable instant")]
    InvalidExpiry,
}

/// Deterministically validate token claims against a supplied clock.
///
/// Signature verification and issuer/audience pinning happen at the wire
/// layer; this checks only the expiry instant, with no leeway. `exp` marks
/// the first invalid second.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let expires_at = claims
        .expires_at()
        .ok_or(TokenValidationError::InvalidExpiry)?;
    if now >= expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
