//! User model for Materials Hub.

/// User entity representing a registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last login timestamp (optional).
    pub last_login: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// New user for creation.
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Password hash (already hashed, never plaintext).
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_fields() {
        let new_user = NewUser {
            email: "coach@example.com".to_string(),
            password: "$argon2id$...".to_string(),
        };
        assert_eq!(new_user.email, "coach@example.com");
        assert!(new_user.password.starts_with("$argon2id$"));
    }
}
