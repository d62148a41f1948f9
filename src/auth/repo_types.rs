use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the credential store.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub name: String,                 // display name, trimmed
    pub email: String,                // normalized email
    pub password_hash: String,        // Argon2 PHC string, never leaves the server
    pub created_at: OffsetDateTime,   // creation timestamp
}

impl User {
    /// Builds a fresh record with a new id and the current time.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_get_fresh_ids() {
        let a = User::new("Ann".into(), "a@test.com".into(), "h".into());
        let b = User::new("Ann".into(), "a@test.com".into(), "h".into());
        assert_ne!(a.id, b.id);
        assert!(a.created_at <= OffsetDateTime::now_utc());
    }
}
