use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string; `None` for accounts that cannot use the password flow.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Persisted bearer token. Only the SHA-256 of the secret is ever stored.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub revoked_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub last_used_at: Option<OffsetDateTime>,
}

/// A live token joined to its owner.
#[derive(Debug, Clone)]
pub struct ActiveToken {
    pub token_id: i64,
    pub user: User,
}

#[derive(Debug, FromRow)]
pub(crate) struct ActiveTokenRow {
    pub token_id: i64,
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<ActiveTokenRow> for ActiveToken {
    fn from(r: ActiveTokenRow) -> Self {
        Self {
            token_id: r.token_id,
            user: User {
                id: r.id,
                email: r.email,
                password_hash: r.password_hash,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
        }
    }
}
