use serde::{Deserialize, Serialize};

/// Public profile of a storefront account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A registered account as kept in the user list.
///
/// Passwords are kept and compared verbatim; these are demo accounts only.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct StoredUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl StoredUser {
    pub fn profile(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login or signup.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}
