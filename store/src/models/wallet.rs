use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    pub id: Uuid,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// A zero-balance wallet stamped with the current time.
    pub fn empty(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
