use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for a stored billing record. The bcrypt secret hash is
/// deliberately never selected into this struct; it is write-only.
#[derive(Debug, Clone, FromRow)]
pub struct BillingRecord {
    pub id: i64,
    pub service: String,
    pub username: String,
    /// Provider-tagged JSON document, stored opaquely as text.
    pub payload: String,
    pub category_id: Option<i64>,
    pub created_at: NaiveDateTime,
}
