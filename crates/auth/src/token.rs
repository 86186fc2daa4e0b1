//! HS256 token issuance and verification.
//!
//! The issuer signs a [`ClaimSet`] into a compact JWT; the validator is the
//! transport-side seam the HTTP layer holds as a trait object. Both sides are
//! pinned to a single issuer string that doubles as the audience.

use core::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{ClaimSet, JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,
}

/// Raw HMAC key material. `Debug` redacts; the bytes never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Issuance parameters: issuer (also used as audience), key material and the
/// validity window in whole days.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    issuer: String,
    secret: SigningSecret,
    validity_days: u32,
}

impl TokenConfig {
    pub fn new(issuer: impl Into<String>, secret: SigningSecret, validity_days: u32) -> Self {
        Self {
            issuer: issuer.into(),
            secret,
            validity_days,
        }
    }
}

/// A freshly signed bearer token plus its expiry instant.
///
/// `expires_at` and the embedded `exp` claim denote the same second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signs claim sets into HS256 bearer tokens.
pub struct Hs256TokenIssuer {
    config: TokenConfig,
    encoding_key: EncodingKey,
}

impl Hs256TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
        }
    }

    /// Issue a token for the claim set, expiring `validity_days` from now.
    pub fn issue(&self, claims: &ClaimSet) -> Result<SignedToken, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Issue with an explicit issuance instant.
    ///
    /// The instant is captured once: the returned expiry and the `exp` claim
    /// are derived from the same value, truncated to whole seconds.
    pub fn issue_at(
        &self,
        claims: &ClaimSet,
        issued_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let exp = issued_at.timestamp() + i64::from(self.config.validity_days) * 86_400;
        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(TokenError::ExpiryOutOfRange)?;

        let wire = JwtClaims {
            sub: claims.subject(),
            name: claims.display_name().to_string(),
            jti: claims.token_id(),
            roles: claims.roles().to_vec(),
            iss: self.config.issuer.clone(),
            aud: self.config.issuer.clone(),
            exp,
        };

        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, &self.encoding_key)?;

        Ok(SignedToken { token, expires_at })
    }
}

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Transport-side token verification seam.
///
/// Object-safe so the HTTP layer can hold it as a trait object.
pub trait JwtValidator: Send + Sync {
    /// Verify signature, issuer, audience and expiry against `now`.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenDecodeError>;
}

/// HS256 verification pinned to a single issuer/audience pair.
pub struct Hs256JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(issuer: &str, secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock,
        // exactly and with zero leeway.
        validation.validate_exp = false;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenDecodeError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::claims::build_claims;
    use crate::principal::{Principal, PrincipalId};
    use crate::roles::{ADMIN, RoleName};

    fn secret() -> SigningSecret {
        SigningSecret::new("unit-test-secret").unwrap()
    }

    fn issuer() -> Hs256TokenIssuer {
        Hs256TokenIssuer::new(TokenConfig::new("sigil-test", secret(), 7))
    }

    fn validator() -> Hs256JwtValidator {
        Hs256JwtValidator::new("sigil-test", &secret())
    }

    fn test_claims() -> ClaimSet {
        let principal = Principal {
            id: PrincipalId::new(),
            login_name: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
        };
        build_claims(&principal, vec![ADMIN, RoleName::new("Ops")])
    }

    #[test]
    fn issued_token_round_trips_through_the_validator() {
        let claims = test_claims();
        let signed = issuer().issue(&claims).unwrap();

        let decoded = validator().validate(&signed.token, Utc::now()).unwrap();
        assert_eq!(decoded.sub, claims.subject());
        assert_eq!(decoded.name, claims.display_name());
        assert_eq!(decoded.jti, claims.token_id());
        assert_eq!(decoded.roles, claims.roles());
        assert_eq!(decoded.iss, "sigil-test");
        assert_eq!(decoded.aud, "sigil-test");
    }

    #[test]
    fn expiry_equals_issuance_plus_validity_window() {
        let issued_at = Utc::now();
        let signed = issuer().issue_at(&test_claims(), issued_at).unwrap();

        assert_eq!(
            signed.expires_at.timestamp(),
            issued_at.timestamp() + 7 * 86_400
        );

        let decoded = validator().validate(&signed.token, issued_at).unwrap();
        assert_eq!(decoded.exp, signed.expires_at.timestamp());
    }

    #[test]
    fn zero_day_window_expires_immediately() {
        let zero = Hs256TokenIssuer::new(TokenConfig::new("sigil-test", secret(), 0));
        let issued_at = Utc::now();
        let signed = zero.issue_at(&test_claims(), issued_at).unwrap();

        let err = validator().validate(&signed.token, issued_at).unwrap_err();
        assert!(matches!(
            err,
            TokenDecodeError::Claims(TokenValidationError::Expired)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued_at = Utc::now() - Duration::days(8);
        let signed = issuer().issue_at(&test_claims(), issued_at).unwrap();

        let err = validator().validate(&signed.token, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            TokenDecodeError::Claims(TokenValidationError::Expired)
        ));
    }

    #[test]
    fn wrong_key_signature_is_rejected() {
        let signed = issuer().issue(&test_claims()).unwrap();

        let other =
            Hs256JwtValidator::new("sigil-test", &SigningSecret::new("other-secret").unwrap());
        assert!(matches!(
            other.validate(&signed.token, Utc::now()),
            Err(TokenDecodeError::Jwt(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let signed = issuer().issue(&test_claims()).unwrap();

        let other = Hs256JwtValidator::new("someone-else", &secret());
        assert!(matches!(
            other.validate(&signed.token, Utc::now()),
            Err(TokenDecodeError::Jwt(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validator().validate("not-a-jwt", Utc::now()).is_err());
    }

    #[test]
    fn empty_secret_is_a_construction_error() {
        assert_eq!(SigningSecret::new(""), Err(TokenConfigError::EmptySecret));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let secret = SigningSecret::new("super-sensitive").unwrap();
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("super-sensitive"));

        let config = TokenConfig::new("sigil-test", secret, 7);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-sensitive"));
    }
}
