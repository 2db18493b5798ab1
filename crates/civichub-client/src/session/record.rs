//! Persisted form of the client session.

use serde::{Deserialize, Serialize};

use civichub_entity::account::AccountView;

/// What survives a restart: the identity and the flags derived from it.
///
/// The flags are stored for readability only; they are recomputed from
/// `user` on every write and every load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Signed-in identity, if any.
    #[serde(default)]
    pub user: Option<AccountView>,
    /// Whether an identity is present.
    #[serde(default)]
    pub is_authenticated: bool,
    /// Whether the identity holds the admin role.
    #[serde(default)]
    pub is_admin: bool,
}

impl SessionRecord {
    /// Build a record with flags derived from `user`.
    pub fn from_user(user: Option<AccountView>) -> Self {
        Self {
            is_authenticated: user.is_some(),
            is_admin: user.as_ref().is_some_and(AccountView::is_admin),
            user,
        }
    }

    /// The signed-out record.
    pub fn blank() -> Self {
        Self::from_user(None)
    }

    /// Recompute the flags from `user`, discarding whatever was stored.
    pub fn normalized(self) -> Self {
        Self::from_user(self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use civichub_entity::account::AccountRole;
    use uuid::Uuid;

    fn view(role: AccountRole) -> AccountView {
        AccountView {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            username: "a".into(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_flags_follow_user() {
        let record = SessionRecord::from_user(Some(view(AccountRole::Admin)));
        assert!(record.is_authenticated);
        assert!(record.is_admin);

        let record = SessionRecord::from_user(Some(view(AccountRole::User)));
        assert!(record.is_authenticated);
        assert!(!record.is_admin);

        assert_eq!(SessionRecord::blank(), SessionRecord::default());
    }

    #[test]
    fn test_tampered_flags_are_recomputed() {
        let json = r#"{"user": null, "is_authenticated": true, "is_admin": true}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        let record = record.normalized();
        assert!(!record.is_authenticated);
        assert!(!record.is_admin);
    }
}
