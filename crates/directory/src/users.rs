//! In-memory user directory.

use std::collections::HashMap;
use std::sync::RwLock;

use sigil_auth::{DirectoryError, NewPrincipal, Principal, PrincipalId, RoleName, UserDirectory};

use crate::password;

struct UserRecord {
    principal: Principal,
    password_hash: String,
    roles: Vec<RoleName>,
}

/// `RwLock<HashMap>`-backed directory for tests and single-process
/// deployments.
///
/// Login names are stored trimmed and lower-cased; lookups normalize the same
/// way, so uniqueness is case-insensitive.
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(login_name: &str) -> String {
    login_name.trim().to_lowercase()
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_login_name(&self, login_name: &str) -> Result<Option<Principal>, DirectoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| DirectoryError::storage("user directory lock poisoned"))?;
        Ok(map
            .get(&normalize(login_name))
            .map(|record| record.principal.clone()))
    }

    fn create(&self, principal: NewPrincipal, secret: &str) -> Result<Principal, DirectoryError> {
        let login_name = normalize(&principal.login_name);

        // Hash outside the write lock; Argon2 is deliberately slow.
        let password_hash = password::hash_password(secret)
            .map_err(|err| DirectoryError::storage(err.to_string()))?;

        let mut map = self
            .inner
            .write()
            .map_err(|_| DirectoryError::storage("user directory lock poisoned"))?;
        if map.contains_key(&login_name) {
            return Err(DirectoryError::DuplicateLoginName(login_name));
        }

        let stored = Principal {
            id: PrincipalId::new(),
            login_name: login_name.clone(),
            first_name: principal.first_name,
            last_name: principal.last_name,
        };

        map.insert(
            login_name,
            UserRecord {
                principal: stored.clone(),
                password_hash,
                roles: Vec::new(),
            },
        );

        Ok(stored)
    }

    fn verify_secret(&self, principal: &Principal, secret: &str) -> Result<bool, DirectoryError> {
        let password_hash = {
            let map = self
                .inner
                .read()
                .map_err(|_| DirectoryError::storage("user directory lock poisoned"))?;
            map.get(&normalize(&principal.login_name))
                .ok_or(DirectoryError::UnknownPrincipal)?
                .password_hash
                .clone()
        };

        Ok(password::verify_password(&password_hash, secret))
    }

    fn roles_of(&self, principal: &Principal) -> Result<Vec<RoleName>, DirectoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| DirectoryError::storage("user directory lock poisoned"))?;
        let record = map
            .get(&normalize(&principal.login_name))
            .ok_or(DirectoryError::UnknownPrincipal)?;
        Ok(record.roles.clone())
    }

    fn add_to_role(&self, principal: &Principal, role: &RoleName) -> Result<(), DirectoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DirectoryError::storage("user directory lock poisoned"))?;
        let record = map
            .get_mut(&normalize(&principal.login_name))
            .ok_or(DirectoryError::UnknownPrincipal)?;

        if record.roles.contains(role) {
            return Err(DirectoryError::AlreadyInRole(role.as_str().to_string()));
        }
        record.roles.push(role.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_auth::ADMIN;

    fn new_principal(login_name: &str) -> NewPrincipal {
        NewPrincipal {
            login_name: login_name.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn create_normalizes_and_finds_case_insensitively() {
        let directory = InMemoryUserDirectory::new();
        let created = directory
            .create(new_principal("  Alice@Example.COM "), "pw")
            .unwrap();
        assert_eq!(created.login_name, "alice@example.com");

        let found = directory
            .find_by_login_name("ALICE@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn duplicate_login_names_conflict_across_case() {
        let directory = InMemoryUserDirectory::new();
        directory
            .create(new_principal("alice@example.com"), "pw")
            .unwrap();
        let err = directory
            .create(new_principal("Alice@Example.com"), "pw")
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateLoginName(_)));
    }

    #[test]
    fn verify_secret_checks_the_stored_hash() {
        let directory = InMemoryUserDirectory::new();
        let principal = directory
            .create(new_principal("alice@example.com"), "correct horse")
            .unwrap();

        assert!(directory.verify_secret(&principal, "correct horse").unwrap());
        assert!(!directory.verify_secret(&principal, "battery staple").unwrap());
    }

    #[test]
    fn roles_accumulate_in_assignment_order() {
        let directory = InMemoryUserDirectory::new();
        let principal = directory
            .create(new_principal("alice@example.com"), "pw")
            .unwrap();

        directory
            .add_to_role(&principal, &RoleName::new("Ops"))
            .unwrap();
        directory.add_to_role(&principal, &ADMIN).unwrap();
        directory
            .add_to_role(&principal, &RoleName::new("Billing"))
            .unwrap();

        let roles = directory.roles_of(&principal).unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["Ops", "Admin", "Billing"]);
    }

    #[test]
    fn double_grant_reports_already_in_role() {
        let directory = InMemoryUserDirectory::new();
        let principal = directory
            .create(new_principal("alice@example.com"), "pw")
            .unwrap();

        directory.add_to_role(&principal, &ADMIN).unwrap();
        let err = directory.add_to_role(&principal, &ADMIN).unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyInRole(_)));

        assert_eq!(directory.roles_of(&principal).unwrap().len(), 1);
    }

    #[test]
    fn unknown_principal_handle_is_reported() {
        let directory = InMemoryUserDirectory::new();
        let ghost = Principal {
            id: PrincipalId::new(),
            login_name: "ghost@example.com".to_string(),
            first_name: "Ghost".to_string(),
            last_name: "User".to_string(),
        };

        assert_eq!(
            directory.verify_secret(&ghost, "pw"),
            Err(DirectoryError::UnknownPrincipal)
        );
        assert_eq!(
            directory.roles_of(&ghost),
            Err(DirectoryError::UnknownPrincipal)
        );
    }
}
