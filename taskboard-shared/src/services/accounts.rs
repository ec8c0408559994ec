/// Registration, login and user listing
///
/// Registration and login both answer with a freshly signed token and the
/// public user record. Login failures never reveal whether the email or the
/// password was wrong.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::auth::{
    jwt::{create_token, Claims},
    password::{hash_password, verify_password},
};
use crate::models::user::{CreateUser, PublicUser, Role, User, UNIQUE_EMAIL};
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Token and registration policy
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,

    /// Token lifetime
    pub token_ttl: Duration,

    /// Whether `role: admin` is accepted at registration
    pub allow_admin_registration: bool,
}

/// New account details (password in plaintext, hashed here)
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
}

/// Token plus the user it was issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

fn issue(settings: &AuthSettings, user: &User) -> ServiceResult<AuthResponse> {
    let claims = Claims::new(user.id, user.role, user.email.clone(), settings.token_ttl);
    let token = create_token(&claims, &settings.jwt_secret)?;

    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

/// Creates an account and signs a token for it
///
/// # Errors
///
/// - `Conflict` if the email is already registered
/// - `Validation` on `firstName`/`lastName` when blank after trimming
/// - `Validation` on `role` when admin self-registration is disabled
pub async fn register<S>(
    store: &S,
    settings: &AuthSettings,
    registration: Registration,
) -> ServiceResult<AuthResponse>
where
    S: Store + ?Sized,
{
    let first_name = registration.first_name.trim().to_string();
    let last_name = registration.last_name.trim().to_string();
    if first_name.is_empty() {
        return Err(ServiceError::validation("firstName", "First name is required"));
    }
    if last_name.is_empty() {
        return Err(ServiceError::validation("lastName", "Last name is required"));
    }

    if registration.role.is_admin() && !settings.allow_admin_registration {
        return Err(ServiceError::validation(
            "role",
            "Admin accounts cannot be self-registered",
        ));
    }

    if store.find_user_by_email(&registration.email).await?.is_some() {
        return Err(ServiceError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&registration.password)?;

    let user = store
        .create_user(CreateUser {
            first_name,
            last_name,
            email: registration.email,
            phone: registration.phone,
            password_hash,
            role: registration.role,
        })
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration
            if e.is_unique_violation_of(UNIQUE_EMAIL) {
                ServiceError::Conflict("User already exists".to_string())
            } else {
                ServiceError::Store(e)
            }
        })?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    issue(settings, &user)
}

/// Verifies credentials and signs a token
pub async fn login<S>(
    store: &S,
    settings: &AuthSettings,
    email: &str,
    password: &str,
) -> ServiceResult<AuthResponse>
where
    S: Store + ?Sized,
{
    let Some(user) = store.find_user_by_email(email).await? else {
        warn!("Login attempt for unknown email");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.id, "User logged in");

    issue(settings, &user)
}

/// All users, without password hashes
pub async fn list_users<S>(store: &S) -> ServiceResult<Vec<PublicUser>>
where
    S: Store + ?Sized,
{
    Ok(store
        .list_users()
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::store::{memory::MemoryStore, UserStore};

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "accounts-test-secret-of-32-bytes!".to_string(),
            token_ttl: Duration::hours(24),
            allow_admin_registration: true,
        }
    }

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            first_name: "Linus".to_string(),
            last_name: "Torvalds".to_string(),
            email: email.to_string(),
            phone: Some("555-0199".to_string()),
            password: "hunter22".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let settings = settings();

        let registered = register(&store, &settings, registration("l@example.com", Role::User))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "l@example.com");
        assert_eq!(registered.user.role, Role::User);

        let claims = validate_token(&registered.token, &settings.jwt_secret).unwrap();
        assert_eq!(claims.id, registered.user.id);
        assert_eq!(claims.role, Role::User);

        let logged_in = login(&store, &settings, "l@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        // Stored hash is never the plaintext
        let stored = store.find_user_by_email("l@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter22");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        register(&store, &settings(), registration("dup@example.com", Role::User))
            .await
            .unwrap();

        let err = register(&store, &settings(), registration("dup@example.com", Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(list_users(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        register(&store, &settings(), registration("x@example.com", Role::User))
            .await
            .unwrap();

        let wrong_password = login(&store, &settings(), "x@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = login(&store, &settings(), "y@example.com", "hunter22")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_admin_registration_can_be_disabled() {
        let store = MemoryStore::new();
        let settings = AuthSettings {
            allow_admin_registration: false,
            ..settings()
        };

        let err = register(&store, &settings, registration("a@example.com", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "role"));
        assert!(list_users(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_names_are_rejected_and_names_trimmed() {
        let store = MemoryStore::new();

        let blank_first = Registration {
            first_name: "   ".to_string(),
            ..registration("blank@example.com", Role::User)
        };
        let err = register(&store, &settings(), blank_first).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "firstName"));

        let blank_last = Registration {
            last_name: "\t".to_string(),
            ..registration("blank@example.com", Role::User)
        };
        let err = register(&store, &settings(), blank_last).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "lastName"));
        assert!(list_users(&store).await.unwrap().is_empty());

        let padded = Registration {
            first_name: "  Ada ".to_string(),
            ..registration("ada@example.com", Role::User)
        };
        let registered = register(&store, &settings(), padded).await.unwrap();
        assert_eq!(registered.user.first_name, "Ada");
    }
}
