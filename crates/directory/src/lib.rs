//! `sigil-directory` — in-memory reference implementation of the identity
//! directory contracts, with Argon2id password hashing.

pub mod password;
pub mod roles;
pub mod users;

pub use roles::InMemoryRoleDirectory;
pub use users::InMemoryUserDirectory;
