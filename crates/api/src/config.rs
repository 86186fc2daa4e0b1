//! Environment-sourced configuration, parsed once at startup.

use sigil_auth::{SigningSecret, TokenConfigError};
use thiserror::Error;

const DEFAULT_ISSUER: &str = "sigil";
const DEFAULT_VALIDITY_DAYS: u32 = 7;
const INSECURE_DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Secret(#[from] TokenConfigError),

    #[error("SIGIL_TOKEN_VALIDITY_DAYS must be a whole number of days, got '{0}'")]
    InvalidValidityDays(String),
}

/// Bootstrap administrator credentials, seeded idempotently at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable service configuration. Built once in `main`, injected everywhere.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub issuer: String,
    pub secret: SigningSecret,
    pub validity_days: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    /// Read configuration from the environment.
    ///
    /// `SIGIL_JWT_SECRET` unset falls back to an insecure development default
    /// with a warning; set-but-empty is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = secret_from(std::env::var("SIGIL_JWT_SECRET").ok())?;

        let issuer = std::env::var("SIGIL_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let validity_days = validity_days_from(std::env::var("SIGIL_TOKEN_VALIDITY_DAYS").ok())?;

        let bootstrap_admin = match (
            std::env::var("SIGIL_BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("SIGIL_BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => {
                tracing::warn!(
                    "bootstrap admin requires both SIGIL_BOOTSTRAP_ADMIN_EMAIL and \
                     SIGIL_BOOTSTRAP_ADMIN_PASSWORD; skipping seed"
                );
                None
            }
            (Err(_), Err(_)) => None,
        };

        Ok(Self {
            issuer,
            secret,
            validity_days,
            bootstrap_admin,
        })
    }
}

fn secret_from(raw: Option<String>) -> Result<SigningSecret, ConfigError> {
    match raw {
        Some(raw) => Ok(SigningSecret::new(raw)?),
        None => {
            tracing::warn!("SIGIL_JWT_SECRET not set; using insecure dev default");
            Ok(SigningSecret::new(INSECURE_DEV_SECRET)?)
        }
    }
}

fn validity_days_from(raw: Option<String>) -> Result<u32, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValidityDays(raw)),
        None => Ok(DEFAULT_VALIDITY_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let secret = secret_from(None).unwrap();
        assert_eq!(secret.as_bytes(), INSECURE_DEV_SECRET.as_bytes());

        assert_eq!(validity_days_from(None).unwrap(), DEFAULT_VALIDITY_DAYS);
    }

    #[test]
    fn empty_secret_is_fatal() {
        assert!(matches!(
            secret_from(Some(String::new())),
            Err(ConfigError::Secret(TokenConfigError::EmptySecret))
        ));
    }

    #[test]
    fn unparsable_validity_days_are_fatal() {
        let err = validity_days_from(Some("banana".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValidityDays(raw) if raw == "banana"));

        assert!(matches!(
            validity_days_from(Some("-3".to_string())),
            Err(ConfigError::InvalidValidityDays(_))
        ));
    }

    #[test]
    fn validity_days_tolerate_surrounding_whitespace() {
        assert_eq!(validity_days_from(Some(" 30 ".to_string())).unwrap(), 30);
    }
}
