use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::billing::handlers::{self, BillingState};
use crate::features::billing::services::{BillingService, ScrapeService};

/// Create routes for the billing feature. Paths follow the wire contract
/// the existing client consumes.
pub fn routes(scrape: Arc<ScrapeService>, billing: Arc<BillingService>) -> Router {
    Router::new()
        .route("/api/save", post(handlers::save_billing))
        .route("/billing-info", get(handlers::list_billing_records))
        .route(
            "/update-billing-category",
            post(handlers::update_billing_category),
        )
        .with_state(BillingState { scrape, billing })
}
