use sigil_auth::{PrincipalId, RoleName};

/// Principal context for a request (authenticated identity + role claims).
///
/// This is immutable and present on every route behind the bearer middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    display_name: String,
    roles: Vec<RoleName>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, display_name: String, roles: Vec<RoleName>) -> Self {
        Self {
            principal_id,
            display_name,
            roles,
        }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }
}
