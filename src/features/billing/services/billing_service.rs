use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::billing::dtos::BillingRecordDto;
use crate::features::billing::models::BillingRecord;
use crate::features::providers::normalize::NormalizedEntry;
use crate::features::providers::ServiceKind;

/// Per-entry persistence outcome. A duplicate is an idempotent no-op, not
/// an error: resubmitting the same bill event must not create a second row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted(i64),
    SkippedDuplicate,
}

/// Service owning the durable representation of billing records: dedup,
/// inserts, reads, and category assignment.
pub struct BillingService {
    pool: SqlitePool,
}

impl BillingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist the normalized entries of one scrape. The submitted secret is
    /// hashed once (bcrypt, write-only) and stored alongside every inserted
    /// row. Inserts ride on `ON CONFLICT DO NOTHING` over the unique
    /// `(service, dedup_key)` index, so the duplicate check and the insert
    /// are one atomic statement.
    pub async fn save_scrape(
        &self,
        service: ServiceKind,
        username: &str,
        secret: &str,
        entries: &[NormalizedEntry],
    ) -> Result<Vec<SaveOutcome>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let secret_hash = Self::hash_secret(secret).await?;

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            let result = sqlx::query(
                r#"
                INSERT INTO billing_records (service, username, secret_hash, payload, dedup_key)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (service, dedup_key) DO NOTHING
                "#,
            )
            .bind(service.as_str())
            .bind(username)
            .bind(&secret_hash)
            .bind(entry.document.to_string())
            .bind(&entry.dedup_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert billing record: {:?}", e);
                AppError::Database(e)
            })?;

            if result.rows_affected() == 0 {
                tracing::info!(
                    "Entry already exists for service {} with key '{}'",
                    service,
                    entry.dedup_key
                );
                outcomes.push(SaveOutcome::SkippedDuplicate);
            } else {
                let id = result.last_insert_rowid();
                tracing::info!("Saved billing record {} for service {}", id, service);
                outcomes.push(SaveOutcome::Inserted(id));
            }
        }

        Ok(outcomes)
    }

    /// List every stored billing record, oldest first. Clients filter and
    /// group on their side.
    pub async fn list(&self) -> Result<Vec<BillingRecordDto>> {
        let records = sqlx::query_as::<_, BillingRecord>(
            r#"
            SELECT id, service, username, payload, category_id, created_at
            FROM billing_records
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list billing records: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Assign a category to a billing record. Both sides of the relation
    /// are checked: a dangling category id is rejected the same way a
    /// missing record is.
    pub async fn assign_category(&self, billing_id: i64, category_id: i64) -> Result<()> {
        let category = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up category: {:?}", e);
                AppError::Database(e)
            })?;

        if category.is_none() {
            return Err(AppError::NotFound(format!(
                "Category '{}' not found",
                category_id
            )));
        }

        let result = sqlx::query("UPDATE billing_records SET category_id = ? WHERE id = ?")
            .bind(category_id)
            .bind(billing_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update billing category: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Billing record '{}' not found",
                billing_id
            )));
        }

        tracing::info!(
            "Category {} assigned to billing record {}",
            category_id,
            billing_id
        );
        Ok(())
    }

    async fn hash_secret(secret: &str) -> Result<String> {
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || bcrypt::hash(secret, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("failed to hash secret: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::providers::normalize::normalize;
    use crate::shared::test_helpers::test_pool;
    use serde_json::json;

    fn water_entry(balance: &str, status: &str) -> NormalizedEntry {
        normalize(
            ServiceKind::Water,
            json!({
                "registryNumber": "7731",
                "consumer": "Consumer One",
                "address": "Main St 5",
                "position": "Center",
                "region": "Region A",
                "status": status,
                "balance": balance,
            }),
        )
    }

    #[tokio::test]
    async fn same_bill_event_is_stored_exactly_once() {
        let service = BillingService::new(test_pool().await);
        let entries = vec![water_entry("42.30", "Active")];

        let first = service
            .save_scrape(ServiceKind::Water, "u1", "p1", &entries)
            .await
            .unwrap();
        assert!(matches!(first[0], SaveOutcome::Inserted(_)));

        let second = service
            .save_scrape(ServiceKind::Water, "u1", "p1", &entries)
            .await
            .unwrap();
        assert_eq!(second, vec![SaveOutcome::SkippedDuplicate]);

        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn overlapping_amount_text_does_not_suppress_insert() {
        let service = BillingService::new(test_pool().await);

        service
            .save_scrape(ServiceKind::Water, "u1", "p1", &[water_entry("42.30", "Active")])
            .await
            .unwrap();
        let outcomes = service
            .save_scrape(ServiceKind::Water, "u1", "p1", &[water_entry("142.30", "Active")])
            .await
            .unwrap();

        assert!(matches!(outcomes[0], SaveOutcome::Inserted(_)));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn sentinel_fields_still_produce_a_record() {
        let service = BillingService::new(test_pool().await);
        let entry = normalize(
            ServiceKind::Electricity,
            json!({
                "accountNumber": "Not found",
                "address": "Main St 5",
                "dueDate": "Not found",
                "paymentAmount": "Not found",
            }),
        );

        let outcomes = service
            .save_scrape(ServiceKind::Electricity, "u1", "p1", &[entry])
            .await
            .unwrap();

        assert!(matches!(outcomes[0], SaveOutcome::Inserted(_)));
    }

    #[tokio::test]
    async fn listed_payload_parses_back_to_extracted_fields() {
        let service = BillingService::new(test_pool().await);
        service
            .save_scrape(ServiceKind::Water, "u1", "p1", &[water_entry("42.30", "Active")])
            .await
            .unwrap();

        let records = service.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].service, "water");
        assert_eq!(records[0].categories, None);

        let payload: serde_json::Value = serde_json::from_str(&records[0].data).unwrap();
        assert_eq!(payload["provider"], "water");
        assert_eq!(payload["balance"], "42.30");
        assert_eq!(payload["status"], "Active");
        assert_eq!(payload["address"], "Main St 5");
    }

    #[tokio::test]
    async fn assign_category_rejects_missing_record() {
        let service = BillingService::new(test_pool().await);

        let err = service.assign_category(999, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn assign_category_rejects_dangling_category() {
        let service = BillingService::new(test_pool().await);
        service
            .save_scrape(ServiceKind::Water, "u1", "p1", &[water_entry("42.30", "Active")])
            .await
            .unwrap();

        let err = service.assign_category(1, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let records = service.list().await.unwrap();
        assert_eq!(records[0].categories, None);
    }

    #[tokio::test]
    async fn assign_category_sets_the_relation() {
        let service = BillingService::new(test_pool().await);
        let outcomes = service
            .save_scrape(ServiceKind::Water, "u1", "p1", &[water_entry("42.30", "Active")])
            .await
            .unwrap();
        let SaveOutcome::Inserted(id) = outcomes[0] else {
            panic!("expected insert");
        };

        service.assign_category(id, 1).await.unwrap();

        let records = service.list().await.unwrap();
        assert_eq!(records[0].categories, Some(1));
    }
}
