//! Billing ingestion feature.
//!
//! Owns the scrape-and-save flow plus every read and mutation on stored
//! billing records.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/save` | Scrape a provider with submitted credentials and persist the result |
//! | GET | `/billing-info` | List every stored billing record |
//! | POST | `/update-billing-category` | Assign a category to a billing record |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{BillingService, ScrapeService};
