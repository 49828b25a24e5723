use std::sync::Arc;

use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::AuthError;
use crate::database::models::AdminCredential;
use crate::database::{DatabaseError, PortfolioStore};

/// Plaintext that only exists to produce `dummy_hash`.
const DUMMY_PASSWORD: &str = "portfolio-api-dummy-password";

/// Owns the single admin identity.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn PortfolioStore>,
    cost: u32,
    /// Verified against when the username is unknown, so both failure paths
    /// cost one bcrypt evaluation.
    dummy_hash: Arc<str>,
}

impl CredentialStore {
    pub async fn new(store: Arc<dyn PortfolioStore>, cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, cost).await?;
        Ok(Self {
            store,
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Create the admin. Rejected with `AlreadyExists` once any admin exists,
    /// whatever the supplied username.
    /// Surrounding whitespace is stripped from the username before storing.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.store.admin_exists().await? {
            return Err(AuthError::AlreadyExists);
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("Username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("Password cannot be empty".to_string()));
        }

        let password_hash = hash_password(password, self.cost).await?;
        match self
            .store
            .insert_admin(AdminCredential::new(username, password_hash))
            .await
        {
            Ok(()) => {
                info!("Admin account created for {}", username);
                Ok(())
            }
            // Lost a race against a concurrent setup call.
            Err(DatabaseError::AlreadyExists(_)) => Err(AuthError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        match self.store.find_admin(username.trim()).await? {
            Some(admin) => verify_password(password, &admin.password_hash).await,
            None => {
                verify_password(password, &self.dummy_hash).await?;
                Ok(false)
            }
        }
    }

    /// `verify_credentials` folded into the error the HTTP layer reports.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.verify_credentials(username, password).await? {
            Ok(())
        } else {
            warn!("Failed login attempt for {}", username);
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionError, SessionIssuer};
    use crate::database::MemoryStore;
    use chrono::{Duration, Utc};

    async fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()), 4).await.unwrap()
    }

    #[tokio::test]
    async fn second_setup_is_rejected_regardless_of_input() {
        let creds = credentials().await;
        creds.create_admin("admin", "admin123").await.unwrap();
        assert!(matches!(creds.create_admin("admin", "x").await, Err(AuthError::AlreadyExists)));
        assert!(matches!(
            creds.create_admin("someone-else", "admin123").await,
            Err(AuthError::AlreadyExists)
        ));
        assert!(matches!(creds.create_admin("", "").await, Err(AuthError::AlreadyExists)));
        assert!(matches!(creds.create_admin("  ", "pw").await, Err(AuthError::AlreadyExists)));
        assert!(creds.verify_credentials("admin", "admin123").await.unwrap());
        assert!(!creds.verify_credentials("admin", "x").await.unwrap());
    }

    #[tokio::test]
    async fn username_is_stored_trimmed() {
        let creds = credentials().await;
        creds.create_admin(" admin ", "pw").await.unwrap();
        assert!(creds.verify_credentials("admin", "pw").await.unwrap());
        assert!(creds.verify_credentials(" admin", "pw").await.unwrap());
        assert!(!creds.verify_credentials("admin", "other").await.unwrap());
    }

    #[tokio::test]
    async fn setup_login_and_session_lifecycle() {
        let creds = credentials().await;
        let sessions = SessionIssuer::new(b"lifecycle-secret", Duration::hours(24));

        creds.create_admin("admin", "admin123").await.unwrap();
        assert!(matches!(
            creds.create_admin("other", "different").await,
            Err(AuthError::AlreadyExists)
        ));

        creds.authenticate("admin", "admin123").await.unwrap();
        let issued = Utc::now();
        let token = sessions.issue_at("admin", issued).unwrap();
        assert_eq!(sessions.verify(&token).unwrap(), "admin");
        assert_eq!(
            sessions.verify_at(&token, issued + Duration::hours(24)),
            Err(SessionError::Expired)
        );
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let creds = credentials().await;
        creds.create_admin("admin", "admin123").await.unwrap();

        let wrong_password = creds.authenticate("admin", "nope").await.unwrap_err();
        let unknown_user = creds.authenticate("ghost", "admin123").await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn login_before_setup_fails() {
        let creds = credentials().await;
        assert!(!creds.verify_credentials("admin", "admin123").await.unwrap());
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let creds = credentials().await;
        assert!(matches!(creds.create_admin("  ", "pw").await, Err(AuthError::InvalidInput(_))));
        assert!(matches!(creds.create_admin("admin", "").await, Err(AuthError::InvalidInput(_))));
        creds.create_admin("admin", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_setup_creates_exactly_one_admin() {
        let creds = credentials().await;
        let (a, b) = tokio::join!(
            creds.create_admin("first", "pw1"),
            creds.create_admin("second", "pw2")
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    }
}
