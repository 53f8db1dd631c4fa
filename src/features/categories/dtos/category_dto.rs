use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::models::Category;

/// Response DTO for a category. `categoryid` is the field name the client
/// keys its picker on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub categoryid: i64,
    pub name: String,
    pub emoji: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            categoryid: c.id,
            name: c.name,
            emoji: c.emoji,
        }
    }
}
