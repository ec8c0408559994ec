/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: HS256 token issue, validation and unverified decode
/// - [`gateway`]: Bearer header → authenticated [`gateway::AuthContext`]
/// - [`authorization`]: Admin and assignee checks
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Role::User, "u@example.com", Duration::hours(24));
/// let token = create_token(&claims, "secret-key-with-at-least-32-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod gateway;
pub mod jwt;
pub mod password;
