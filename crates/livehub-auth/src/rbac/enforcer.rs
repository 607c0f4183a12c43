//! Role checks for live-room control.

use uuid::Uuid;

use livehub_core::error::AppError;

use crate::principal::Principal;

/// Enforces the elevated-role requirement of control operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Require admin or moderator.
    pub fn require_elevated(principal: &Principal) -> Result<(), AppError> {
        if principal.is_elevated() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' may not perform this action",
                principal.role
            )))
        }
    }

    /// Resolve which user an operation targets. Elevated callers may act
    /// for someone else; everyone else acts on themselves only.
    pub fn acting_user(principal: &Principal, requested: Option<Uuid>) -> Result<Uuid, AppError> {
        match requested {
            Some(user_id) if user_id != principal.user_id => {
                Self::require_elevated(principal)?;
                Ok(user_id)
            }
            _ => Ok(principal.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livehub_entity::user::UserRole;

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            email: "user@example.com".into(),
            name: None,
            role,
        }
    }

    #[test]
    fn test_require_elevated() {
        assert!(RbacEnforcer::require_elevated(&principal(UserRole::Admin)).is_ok());
        assert!(RbacEnforcer::require_elevated(&principal(UserRole::Moderator)).is_ok());
        let err = RbacEnforcer::require_elevated(&principal(UserRole::Attendee)).unwrap_err();
        assert_eq!(err.kind, livehub_core::error::ErrorKind::Authorization);
    }

    #[test]
    fn test_acting_user() {
        let attendee = principal(UserRole::Attendee);
        assert_eq!(
            RbacEnforcer::acting_user(&attendee, None).unwrap(),
            attendee.user_id
        );
        assert_eq!(
            RbacEnforcer::acting_user(&attendee, Some(attendee.user_id)).unwrap(),
            attendee.user_id
        );
        assert!(RbacEnforcer::acting_user(&attendee, Some(Uuid::new_v4())).is_err());

        let admin = principal(UserRole::Admin);
        let other = Uuid::new_v4();
        assert_eq!(RbacEnforcer::acting_user(&admin, Some(other)).unwrap(), other);
    }
}
