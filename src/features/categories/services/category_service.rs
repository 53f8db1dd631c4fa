use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryDto;
use crate::features::categories::models::Category;

/// Service for category reads
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all seeded categories, no filtering.
    pub async fn list(&self) -> Result<Vec<CategoryDto>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, emoji FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list categories: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    #[tokio::test]
    async fn lists_the_seeded_categories() {
        let service = CategoryService::new(test_pool().await);

        let categories = service.list().await.unwrap();

        assert!(!categories.is_empty());
        assert!(categories.iter().any(|c| c.name == "Home"));
        assert!(categories.iter().all(|c| !c.emoji.is_empty()));
    }
}
