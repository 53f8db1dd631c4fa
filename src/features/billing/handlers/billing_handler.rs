use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::billing::dtos::{AssignCategoryDto, BillingRecordDto, ScrapeRequestDto};
use crate::features::billing::services::{BillingService, SaveOutcome, ScrapeService};
use crate::features::providers::normalize::{normalize, NormalizedEntry};
use crate::features::providers::ServiceKind;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct BillingState {
    pub scrape: Arc<ScrapeService>,
    pub billing: Arc<BillingService>,
}

/// Scrape one provider with the submitted credentials and persist the
/// outcome.
///
/// A failed scrape is an application-level error payload, not a transport
/// failure: the client shows a retry prompt off the `status` field. Nothing
/// is stored in that case.
#[utoipa::path(
    post,
    path = "/api/save",
    request_body = ScrapeRequestDto,
    responses(
        (status = 200, description = "Scrape outcome envelope: extracted payload on success, error message on a failed attempt"),
        (status = 400, description = "Missing or invalid request fields"),
    ),
    tag = "billing"
)]
pub async fn save_billing(
    State(state): State<BillingState>,
    AppJson(dto): AppJson<ScrapeRequestDto>,
) -> Result<Json<ApiResponse<Value>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ServiceKind::parse(&dto.service)
        .ok_or_else(|| AppError::Validation("Invalid service".to_string()))?;

    let entries = match state.scrape.scrape(service, &dto.username, &dto.password).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("Scrape failed for service {}: {}", service, err);
            return Ok(Json(ApiResponse::error(format!(
                "{} scraping failed: {}",
                service, err
            ))));
        }
    };

    let normalized: Vec<NormalizedEntry> = entries
        .into_iter()
        .map(|entry| normalize(service, entry))
        .collect();

    let outcomes = state
        .billing
        .save_scrape(service, &dto.username, &dto.password, &normalized)
        .await?;

    let inserted = outcomes
        .iter()
        .filter(|o| matches!(o, SaveOutcome::Inserted(_)))
        .count();
    tracing::info!(
        "Scrape for service {} yielded {} entries ({} new)",
        service,
        normalized.len(),
        inserted
    );

    let mut documents: Vec<Value> = normalized.into_iter().map(|n| n.document).collect();
    let data = if service.multi_entry() {
        Value::Array(documents)
    } else {
        // single-entry providers answer with the bare document
        documents.pop().unwrap_or(Value::Null)
    };

    Ok(Json(ApiResponse::success(Some(data), None)))
}

/// List every stored billing record.
#[utoipa::path(
    get,
    path = "/billing-info",
    responses(
        (status = 200, description = "All stored billing records", body = ApiResponse<Vec<BillingRecordDto>>),
    ),
    tag = "billing"
)]
pub async fn list_billing_records(
    State(state): State<BillingState>,
) -> Result<Json<ApiResponse<Vec<BillingRecordDto>>>> {
    let records = state.billing.list().await?;
    Ok(Json(ApiResponse::success(Some(records), None)))
}

/// Assign a category to a billing record.
#[utoipa::path(
    post,
    path = "/update-billing-category",
    request_body = AssignCategoryDto,
    responses(
        (status = 200, description = "Category assigned"),
        (status = 400, description = "Missing billingid or categoryid"),
        (status = 404, description = "Billing record or category not found"),
    ),
    tag = "billing"
)]
pub async fn update_billing_category(
    State(state): State<BillingState>,
    AppJson(dto): AppJson<AssignCategoryDto>,
) -> Result<Json<ApiResponse<()>>> {
    let (billing_id, category_id) = match (dto.billingid, dto.categoryid) {
        (Some(billing_id), Some(category_id)) => (billing_id, category_id),
        _ => {
            return Err(AppError::Validation(
                "Missing billingId or categoryId".to_string(),
            ))
        }
    };

    state.billing.assign_category(billing_id, category_id).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Category updated successfully".to_string()),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScraperConfig;
    use crate::features::billing::routes;
    use crate::features::providers::{ProviderDriver, ScrapeError};
    use crate::shared::test_helpers::test_pool;
    use async_trait::async_trait;
    use axum_test::TestServer;
    use serde_json::json;
    use std::collections::HashMap;

    /// Driver double: answers with canned entries, or fails at the login
    /// step when none are configured.
    struct StubDriver {
        service: ServiceKind,
        entries: Option<Vec<Value>>,
    }

    #[async_trait]
    impl ProviderDriver for StubDriver {
        fn service(&self) -> ServiceKind {
            self.service
        }

        async fn scrape(&self, _: &str, _: &str) -> std::result::Result<Vec<Value>, ScrapeError> {
            match &self.entries {
                Some(entries) => Ok(entries.clone()),
                None => Err(ScrapeError::Login(
                    "still on login page after submitting credentials".to_string(),
                )),
            }
        }
    }

    fn stub_config() -> ScraperConfig {
        ScraperConfig {
            webdriver_url: "http://localhost:4444".to_string(),
            user_agent: "test".to_string(),
            wait_timeout_secs: 1,
            poll_interval_ms: 10,
            scrape_timeout_secs: 5,
            sessions_per_provider: 1,
        }
    }

    async fn test_server(service: ServiceKind, entries: Option<Vec<Value>>) -> TestServer {
        let mut drivers: HashMap<ServiceKind, std::sync::Arc<dyn ProviderDriver>> = HashMap::new();
        drivers.insert(service, std::sync::Arc::new(StubDriver { service, entries }));

        let scrape = Arc::new(ScrapeService::new(drivers, &stub_config()));
        let billing = Arc::new(BillingService::new(test_pool().await));
        TestServer::new(routes::routes(scrape, billing)).unwrap()
    }

    #[tokio::test]
    async fn water_scrape_persists_and_lists_the_extracted_fields() {
        let server = test_server(
            ServiceKind::Water,
            Some(vec![json!({
                "registryNumber": "7731",
                "consumer": "Consumer One",
                "address": "Main St 5",
                "position": "Center",
                "region": "Region A",
                "status": "Active",
                "balance": "42.30",
            })]),
        )
        .await;

        let response = server
            .post("/api/save")
            .json(&json!({"service": "water", "username": "u1", "password": "p1"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["address"], "Main St 5");
        assert_eq!(body["data"]["balance"], "42.30");
        assert_eq!(body["data"]["status"], "Active");

        let listing: Value = server.get("/billing-info").await.json();
        assert_eq!(listing["status"], "success");
        let records = listing["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["service"], "water");
        let data = records[0]["data"].as_str().unwrap();
        assert!(data.contains("42.30"));
        assert!(data.contains("Active"));
    }

    #[tokio::test]
    async fn telecom_scrape_answers_with_an_array() {
        let server = test_server(
            ServiceKind::Telecom,
            Some(vec![
                json!({"connection": "69xxxxxxx1", "billNumber": "B-1", "totalAmount": "31,50€", "dueDate": "20/05"}),
                json!({"connection": "69xxxxxxx2", "billNumber": "B-2", "totalAmount": "12,00€", "dueDate": "22/05"}),
            ]),
        )
        .await;

        let response = server
            .post("/api/save")
            .json(&json!({"service": "telecom", "username": "u1", "password": "p1"}))
            .await;

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let listing: Value = server.get("/billing-info").await.json();
        assert_eq!(listing["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_login_creates_no_record() {
        let server = test_server(ServiceKind::Water, None).await;

        let response = server
            .post("/api/save")
            .json(&json!({"service": "water", "username": "u1", "password": "wrong"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("water scraping failed"));

        let listing: Value = server.get("/billing-info").await.json();
        assert_eq!(listing["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_service_is_a_validation_error() {
        let server = test_server(ServiceKind::Water, Some(vec![])).await;

        let response = server
            .post("/api/save")
            .json(&json!({"service": "gas", "username": "u1", "password": "p1"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid service");
    }

    #[tokio::test]
    async fn assignment_without_category_id_changes_nothing() {
        let server = test_server(
            ServiceKind::Water,
            Some(vec![json!({"status": "Active", "balance": "42.30"})]),
        )
        .await;
        server
            .post("/api/save")
            .json(&json!({"service": "water", "username": "u1", "password": "p1"}))
            .await;

        let response = server
            .post("/update-billing-category")
            .json(&json!({"billingid": 1}))
            .await;

        response.assert_status_bad_request();
        let listing: Value = server.get("/billing-info").await.json();
        assert_eq!(listing["data"][0]["categories"], Value::Null);
    }

    #[tokio::test]
    async fn assignment_to_missing_record_is_not_found() {
        let server = test_server(ServiceKind::Water, Some(vec![])).await;

        let response = server
            .post("/update-billing-category")
            .json(&json!({"billingid": 41, "categoryid": 1}))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn assignment_round_trips_through_the_listing() {
        let server = test_server(
            ServiceKind::Water,
            Some(vec![json!({"status": "Active", "balance": "42.30"})]),
        )
        .await;
        server
            .post("/api/save")
            .json(&json!({"service": "water", "username": "u1", "password": "p1"}))
            .await;

        let response = server
            .post("/update-billing-category")
            .json(&json!({"billingid": 1, "categoryid": 2}))
            .await;
        response.assert_status_ok();

        let listing: Value = server.get("/billing-info").await.json();
        assert_eq!(listing["data"][0]["categories"], 2);
    }
}
