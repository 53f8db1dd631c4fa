mod billing_service;
mod scrape_service;

pub use billing_service::{BillingService, SaveOutcome};
pub use scrape_service::ScrapeService;
