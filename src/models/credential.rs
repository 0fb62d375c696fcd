use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, sqlx::FromRow)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    /// Bcrypt-hashed values are verified as hashes, anything else by plain equality.
    pub fn matches(&self, supplied: &str) -> bool {
        if is_bcrypt_hash(&self.password) {
            return bcrypt::verify(supplied, &self.password).unwrap_or(false);
        }
        self.password == supplied
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
}
