/// Bearer-token authentication gateway
///
/// Turns an `Authorization` header value into an [`AuthContext`]: the token
/// must carry a valid signature and expiry, and the identity it names must
/// still exist. The HTTP layer calls [`authenticate`] from its middleware and
/// inserts the resulting context into request extensions; handlers never see
/// a request that failed here.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{PublicUser, Role};
use crate::store::{StoreError, UserStore};

/// Authenticated caller, resolved from the store
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub user_id: Uuid,

    /// Current role from the store (not the role claimed in the token)
    pub role: Role,

    pub email: String,

    /// The caller's user record, without password hash
    pub user: PublicUser,
}

impl AuthContext {
    pub fn from_user(user: PublicUser) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            email: user.email.clone(),
            user,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Error type for the auth gateway
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Not authorized, no token")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Signature, issuer or expiry check failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token is valid but its user no longer exists
    #[error("User not found")]
    UnknownUser,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Extracts the token from a `Bearer <token>` header value
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Authenticates a request from its `Authorization` header value
pub async fn authenticate<S>(
    store: &S,
    secret: &str,
    header: Option<&str>,
) -> Result<AuthContext, AuthError>
where
    S: UserStore + ?Sized,
{
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let token = bearer_token(header)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Not authorized, token failed".to_string()),
    })?;

    let user = store
        .find_user(claims.id)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    debug!(user_id = %user.id, role = %user.role, "Authenticated request");

    Ok(AuthContext::from_user(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use crate::models::user::CreateUser;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    const SECRET: &str = "gateway-test-secret-of-32-bytes!!";

    async fn store_with_user(role: Role) -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                phone: None,
                password_hash: "hash".to_string(),
                role,
            })
            .await
            .unwrap();
        (store, user.id)
    }

    fn header_for(id: Uuid, role: Role, ttl: Duration) -> String {
        let claims = Claims::new(id, role, "grace@example.com", ttl);
        format!("Bearer {}", create_token(&claims, SECRET).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(matches!(bearer_token("Basic abc"), Err(AuthError::InvalidFormat(_))));
        assert!(matches!(bearer_token("Bearer "), Err(AuthError::InvalidFormat(_))));
        assert!(matches!(bearer_token("Bearerabc"), Err(AuthError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let (store, id) = store_with_user(Role::Admin).await;
        let header = header_for(id, Role::Admin, Duration::hours(1));

        let ctx = authenticate(&store, SECRET, Some(header.as_str())).await.unwrap();
        assert_eq!(ctx.user_id, id);
        assert!(ctx.is_admin());
        assert_eq!(ctx.user.first_name, "Grace");
    }

    #[tokio::test]
    async fn test_role_comes_from_store() {
        let (store, id) = store_with_user(Role::User).await;
        // Token claims admin, store says user
        let header = header_for(id, Role::Admin, Duration::hours(1));

        let ctx = authenticate(&store, SECRET, Some(header.as_str())).await.unwrap();
        assert!(!ctx.is_admin());
    }

    #[tokio::test]
    async fn test_authenticate_failures() {
        let (store, id) = store_with_user(Role::User).await;

        assert!(matches!(
            authenticate(&store, SECRET, None).await,
            Err(AuthError::MissingCredentials)
        ));

        let expired = header_for(id, Role::User, Duration::seconds(-30));
        assert!(matches!(
            authenticate(&store, SECRET, Some(expired.as_str())).await,
            Err(AuthError::InvalidToken(_))
        ));

        let forged = header_for(id, Role::User, Duration::hours(1));
        assert!(matches!(
            authenticate(&store, "some-other-secret-of-32-bytes!!!!", Some(forged.as_str())).await,
            Err(AuthError::InvalidToken(_))
        ));

        let stranger = header_for(Uuid::new_v4(), Role::User, Duration::hours(1));
        assert!(matches!(
            authenticate(&store, SECRET, Some(stranger.as_str())).await,
            Err(AuthError::UnknownUser)
        ));
    }
}
