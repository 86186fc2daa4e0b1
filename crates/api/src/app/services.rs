//! Service wiring for the HTTP layer.

use std::sync::Arc;

use sigil_auth::{
    ADMIN, DirectoryError, Hs256TokenIssuer, NewPrincipal, RoleDirectory, TokenConfig,
    UserDirectory,
};
use sigil_directory::{InMemoryRoleDirectory, InMemoryUserDirectory};

use crate::config::{ApiConfig, BootstrapAdmin};

/// Shared handles the route handlers work with.
pub struct AppServices {
    pub users: Arc<dyn UserDirectory>,
    pub roles: Arc<dyn RoleDirectory>,
    pub issuer: Hs256TokenIssuer,
}

pub fn build_services(config: &ApiConfig) -> Result<AppServices, DirectoryError> {
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
    let roles: Arc<dyn RoleDirectory> = Arc::new(InMemoryRoleDirectory::new());

    let token_config = TokenConfig::new(
        config.issuer.clone(),
        config.secret.clone(),
        config.validity_days,
    );
    let issuer = Hs256TokenIssuer::new(token_config);

    let services = AppServices {
        users,
        roles,
        issuer,
    };

    if let Some(admin) = &config.bootstrap_admin {
        seed_admin(&services, admin)?;
    }

    Ok(services)
}

/// Ensure the administrative role, account and membership exist.
///
/// Safe to run on every startup; existing records are left untouched.
fn seed_admin(services: &AppServices, admin: &BootstrapAdmin) -> Result<(), DirectoryError> {
    if services.roles.find_by_name(ADMIN.as_str())?.is_none() {
        services.roles.create(ADMIN.as_str())?;
    }

    let principal = match services.users.find_by_login_name(&admin.email)? {
        Some(existing) => existing,
        None => services.users.create(
            NewPrincipal {
                login_name: admin.email.clone(),
                first_name: "System".to_string(),
                last_name: "Administrator".to_string(),
            },
            &admin.password,
        )?,
    };

    match services.users.add_to_role(&principal, &ADMIN) {
        Ok(()) | Err(DirectoryError::AlreadyInRole(_)) => {}
        Err(err) => return Err(err),
    }

    tracing::info!(login_name = %principal.login_name, "bootstrap admin ensured");
    Ok(())
}
