/// Role checks run after authentication
///
/// Failing one of these is an authorization error (403), distinct from the
/// authentication errors raised by the gateway (401).
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::authorization::require_admin;
/// use taskboard_shared::models::user::Role;
///
/// assert!(require_admin(Role::Admin).is_ok());
/// assert!(require_admin(Role::User).is_err());
/// ```

use uuid::Uuid;

use crate::models::{task::Task, user::Role};

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not an admin
    #[error("Admin access required")]
    AdminRequired,

    /// Caller is neither an admin nor the task's assignee
    #[error("Only an admin or the assignee can modify this task")]
    NotAssignee,
}

/// Admin gate
pub fn require_admin(role: Role) -> Result<(), AuthzError> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}

/// Admins may touch any task; users only the ones assigned to them
pub fn require_admin_or_assignee(role: Role, user_id: Uuid, task: &Task) -> Result<(), AuthzError> {
    if role.is_admin() || task.assigned_to == Some(user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotAssignee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use chrono::Utc;

    fn task_assigned_to(assignee: Option<Uuid>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "Ship it".to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            assigned_to: assignee,
            comment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(Role::Admin).is_ok());
        assert_eq!(require_admin(Role::User), Err(AuthzError::AdminRequired));
    }

    #[test]
    fn test_require_admin_or_assignee() {
        let me = Uuid::new_v4();
        let mine = task_assigned_to(Some(me));
        let theirs = task_assigned_to(Some(Uuid::new_v4()));
        let unassigned = task_assigned_to(None);

        assert!(require_admin_or_assignee(Role::User, me, &mine).is_ok());
        assert_eq!(
            require_admin_or_assignee(Role::User, me, &theirs),
            Err(AuthzError::NotAssignee)
        );
        assert!(require_admin_or_assignee(Role::User, me, &unassigned).is_err());
        assert!(require_admin_or_assignee(Role::Admin, me, &theirs).is_ok());
    }
}
