use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------
//
// Missing string fields deserialize to empty strings so handler validation
// can report every problem in one enumerated 400 instead of a generic body
// rejection.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRoleRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignRoleRequest {
    pub role: String,
}
