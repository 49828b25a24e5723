pub mod credentials;
pub mod password;
pub mod session;

use thiserror::Error;

use crate::database::DatabaseError;

pub use credentials::CredentialStore;
pub use session::{Claims, SessionError, SessionIssuer};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Admin already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}
