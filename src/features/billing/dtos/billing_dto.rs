use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::billing::models::BillingRecord;

/// Request DTO for the scrape-and-save operation. The password exists only
/// for the lifetime of this request: the driver uses it to log in and the
/// store keeps a one-way hash.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ScrapeRequestDto {
    /// One of `electricity`, `telecom`, `water`.
    pub service: String,

    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Request DTO for category assignment. Field names follow the wire
/// contract consumed by the existing client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignCategoryDto {
    pub billingid: Option<i64>,
    pub categoryid: Option<i64>,
}

/// One stored billing record as the client sees it. `data` stays a JSON
/// string; the client parses it with each provider's native field names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillingRecordDto {
    pub billingid: i64,
    pub service: String,
    pub username: String,
    pub data: String,
    pub categories: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
}

impl From<BillingRecord> for BillingRecordDto {
    fn from(record: BillingRecord) -> Self {
        Self {
            billingid: record.id,
            service: record.service,
            username: record.username,
            data: record.payload,
            categories: record.category_id,
            created_at: record.created_at,
        }
    }
}
