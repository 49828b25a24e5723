use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single administrator identity. `password_hash` is a bcrypt hash string.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminCredential {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
