//! Role lifecycle: creation and assignment on top of the directory traits.

use thiserror::Error;

use crate::directory::{DirectoryError, RoleDirectory, UserDirectory};
use crate::roles::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateRoleError {
    #[error("role name must not be empty")]
    EmptyName,

    #[error("role '{0}' already exists")]
    DuplicateName(String),

    #[error(transparent)]
    Directory(DirectoryError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignRoleError {
    #[error("user not found")]
    PrincipalNotFound,

    #[error("role not found")]
    RoleNotFound,

    #[error("role is already assigned")]
    AlreadyAssigned,

    #[error(transparent)]
    Directory(DirectoryError),
}

/// Create a role with a unique, non-blank name.
///
/// Names are trimmed before storage so later lookups stay consistent;
/// matching remains case-sensitive.
pub fn create_role(roles: &dyn RoleDirectory, name: &str) -> Result<Role, CreateRoleError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CreateRoleError::EmptyName);
    }

    match roles.create(name) {
        Ok(role) => Ok(role),
        Err(DirectoryError::DuplicateRoleName(taken)) => Err(CreateRoleError::DuplicateName(taken)),
        Err(other) => Err(CreateRoleError::Directory(other)),
    }
}

/// Grant an existing role to an existing principal.
///
/// A grant the principal already holds reports
/// [`AssignRoleError::AlreadyAssigned`] and leaves the membership set
/// unchanged.
pub fn assign_role(
    users: &dyn UserDirectory,
    roles: &dyn RoleDirectory,
    login_name: &str,
    role_name: &str,
) -> Result<(), AssignRoleError> {
    let principal = users
        .find_by_login_name(login_name)
        .map_err(AssignRoleError::Directory)?
        .ok_or(AssignRoleError::PrincipalNotFound)?;

    let role = roles
        .find_by_name(role_name.trim())
        .map_err(AssignRoleError::Directory)?
        .ok_or(AssignRoleError::RoleNotFound)?;

    match users.add_to_role(&principal, role.name()) {
        Ok(()) => Ok(()),
        Err(DirectoryError::AlreadyInRole(_)) => Err(AssignRoleError::AlreadyAssigned),
        Err(other) => Err(AssignRoleError::Directory(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use crate::principal::{NewPrincipal, Principal, PrincipalId};
    use crate::roles::RoleName;

    #[derive(Default)]
    struct StubRoles {
        inner: RwLock<HashMap<String, Role>>,
    }

    impl RoleDirectory for StubRoles {
        fn find_by_name(&self, name: &str) -> Result<Option<Role>, DirectoryError> {
            Ok(self.inner.read().unwrap().get(name).cloned())
        }

        fn create(&self, name: &str) -> Result<Role, DirectoryError> {
            let mut map = self.inner.write().unwrap();
            if map.contains_key(name) {
                return Err(DirectoryError::DuplicateRoleName(name.to_string()));
            }
            let role = Role::new(RoleName::new(name.to_string()));
            map.insert(name.to_string(), role.clone());
            Ok(role)
        }
    }

    #[derive(Default)]
    struct StubUsers {
        inner: RwLock<HashMap<String, (Principal, Vec<RoleName>)>>,
    }

    impl StubUsers {
        fn with_user(login_name: &str) -> Self {
            let users = Self::default();
            let principal = Principal {
                id: PrincipalId::new(),
                login_name: login_name.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
            };
            users
                .inner
                .write()
                .unwrap()
                .insert(login_name.to_string(), (principal, Vec::new()));
            users
        }
    }

    impl UserDirectory for StubUsers {
        fn find_by_login_name(
            &self,
            login_name: &str,
        ) -> Result<Option<Principal>, DirectoryError> {
            Ok(self
                .inner
                .read()
                .unwrap()
                .get(login_name)
                .map(|(p, _)| p.clone()))
        }

        fn create(
            &self,
            _principal: NewPrincipal,
            _secret: &str,
        ) -> Result<Principal, DirectoryError> {
            unimplemented!("not needed for role store tests")
        }

        fn verify_secret(
            &self,
            _principal: &Principal,
            _secret: &str,
        ) -> Result<bool, DirectoryError> {
            unimplemented!("not needed for role store tests")
        }

        fn roles_of(&self, principal: &Principal) -> Result<Vec<RoleName>, DirectoryError> {
            Ok(self
                .inner
                .read()
                .unwrap()
                .get(&principal.login_name)
                .map(|(_, roles)| roles.clone())
                .unwrap_or_default())
        }

        fn add_to_role(
            &self,
            principal: &Principal,
            role: &RoleName,
        ) -> Result<(), DirectoryError> {
            let mut map = self.inner.write().unwrap();
            let Some((_, roles)) = map.get_mut(&principal.login_name) else {
                return Err(DirectoryError::UnknownPrincipal);
            };
            if roles.contains(role) {
                return Err(DirectoryError::AlreadyInRole(role.as_str().to_string()));
            }
            roles.push(role.clone());
            Ok(())
        }
    }

    #[test]
    fn create_role_trims_and_stores_the_name() {
        let roles = StubRoles::default();
        let role = create_role(&roles, "  Ops  ").unwrap();
        assert_eq!(role.name().as_str(), "Ops");
        assert!(roles.find_by_name("Ops").unwrap().is_some());
    }

    #[test]
    fn blank_role_names_fail_validation() {
        let roles = StubRoles::default();
        assert_eq!(create_role(&roles, ""), Err(CreateRoleError::EmptyName));
        assert_eq!(create_role(&roles, "   "), Err(CreateRoleError::EmptyName));
    }

    #[test]
    fn duplicate_role_names_are_rejected() {
        let roles = StubRoles::default();
        create_role(&roles, "Ops").unwrap();
        assert_eq!(
            create_role(&roles, "Ops"),
            Err(CreateRoleError::DuplicateName("Ops".to_string()))
        );
    }

    #[test]
    fn role_names_stay_case_sensitive() {
        let roles = StubRoles::default();
        create_role(&roles, "Ops").unwrap();
        assert!(create_role(&roles, "ops").is_ok());
    }

    #[test]
    fn assignment_requires_an_existing_principal() {
        let users = StubUsers::default();
        let roles = StubRoles::default();
        create_role(&roles, "Ops").unwrap();

        assert_eq!(
            assign_role(&users, &roles, "nobody@example.com", "Ops"),
            Err(AssignRoleError::PrincipalNotFound)
        );
    }

    #[test]
    fn assignment_requires_an_existing_role() {
        let users = StubUsers::with_user("alice@example.com");
        let roles = StubRoles::default();

        assert_eq!(
            assign_role(&users, &roles, "alice@example.com", "Ops"),
            Err(AssignRoleError::RoleNotFound)
        );
    }

    #[test]
    fn second_assignment_reports_already_assigned() {
        let users = StubUsers::with_user("alice@example.com");
        let roles = StubRoles::default();
        create_role(&roles, "Ops").unwrap();

        assign_role(&users, &roles, "alice@example.com", "Ops").unwrap();
        assert_eq!(
            assign_role(&users, &roles, "alice@example.com", "Ops"),
            Err(AssignRoleError::AlreadyAssigned)
        );

        let principal = users
            .find_by_login_name("alice@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(users.roles_of(&principal).unwrap().len(), 1);
    }
}
