//! In-memory role directory.

use std::collections::HashMap;
use std::sync::RwLock;

use sigil_auth::{DirectoryError, Role, RoleDirectory, RoleName};

/// Role storage keyed by exact, case-sensitive name.
pub struct InMemoryRoleDirectory {
    inner: RwLock<HashMap<String, Role>>,
}

impl InMemoryRoleDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoleDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDirectory for InMemoryRoleDirectory {
    fn find_by_name(&self, name: &str) -> Result<Option<Role>, DirectoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| DirectoryError::storage("role directory lock poisoned"))?;
        Ok(map.get(name).cloned())
    }

    fn create(&self, name: &str) -> Result<Role, DirectoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DirectoryError::storage("role directory lock poisoned"))?;
        if map.contains_key(name) {
            return Err(DirectoryError::DuplicateRoleName(name.to_string()));
        }

        let role = Role::new(RoleName::new(name.to_string()));
        map.insert(name.to_string(), role.clone());
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_roles_are_found_by_exact_name() {
        let directory = InMemoryRoleDirectory::new();
        let created = directory.create("Ops").unwrap();
        assert_eq!(created.name().as_str(), "Ops");

        let found = directory.find_by_name("Ops").unwrap().unwrap();
        assert_eq!(found, created);

        assert!(directory.find_by_name("ops").unwrap().is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let directory = InMemoryRoleDirectory::new();
        directory.create("Ops").unwrap();

        assert_eq!(
            directory.create("Ops"),
            Err(DirectoryError::DuplicateRoleName("Ops".to_string()))
        );
    }

    #[test]
    fn distinct_roles_get_distinct_ids() {
        let directory = InMemoryRoleDirectory::new();
        let a = directory.create("Ops").unwrap();
        let b = directory.create("Billing").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
