use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::config::{PortalEndpoints, ScraperConfig};
use crate::features::providers::session::PortalSession;
use crate::features::providers::{ProviderDriver, ScrapeError, ServiceKind};
use crate::shared::constants::NOT_FOUND_SENTINEL;

/// The water portal renders the account as one bare table; most fields are
/// addressed by cell position rather than a dedicated class.
#[derive(Debug, Clone)]
pub struct WaterSelectors {
    pub username_input: &'static str,
    pub password_input: &'static str,
    pub submit_button: &'static str,
    pub registry_number: &'static str,
    pub table_cells: &'static str,
    pub consumer_index: usize,
    pub address_index: usize,
    pub position_index: usize,
    pub region_index: usize,
    pub balance_index: usize,
    pub status: &'static str,
}

impl Default for WaterSelectors {
    fn default() -> Self {
        Self {
            username_input: "#username",
            password_input: "#password",
            submit_button: "button[type='submit']",
            registry_number: "td[rowspan='2']",
            table_cells: "td",
            consumer_index: 1,
            address_index: 2,
            position_index: 3,
            region_index: 4,
            balance_index: 7,
            status: ".state.publish .text",
        }
    }
}

/// Driver for the water utility portal: plain form login, one account
/// summary table per user.
pub struct WaterDriver {
    scraper: ScraperConfig,
    endpoints: PortalEndpoints,
    selectors: WaterSelectors,
}

impl WaterDriver {
    pub fn new(scraper: ScraperConfig, endpoints: PortalEndpoints) -> Self {
        Self {
            scraper,
            endpoints,
            selectors: WaterSelectors::default(),
        }
    }

    async fn run(
        &self,
        session: &PortalSession,
        username: &str,
        password: &str,
    ) -> Result<Vec<Value>, ScrapeError> {
        let sel = &self.selectors;

        session.goto(&self.endpoints.login_url).await?;

        session.fill(sel.username_input, username).await?;
        session.fill(sel.password_input, password).await?;
        session.click(sel.submit_button).await?;
        session.await_departure(&self.endpoints.login_url).await?;

        session.goto(&self.endpoints.account_url).await?;
        let _ = session.wait_for(sel.registry_number).await;

        let account = json!({
            "registryNumber": session.text_or(sel.registry_number, NOT_FOUND_SENTINEL).await,
            "consumer": session
                .nth_text_or(sel.table_cells, sel.consumer_index, NOT_FOUND_SENTINEL)
                .await,
            "address": session
                .nth_text_or(sel.table_cells, sel.address_index, NOT_FOUND_SENTINEL)
                .await,
            "position": session
                .nth_text_or(sel.table_cells, sel.position_index, NOT_FOUND_SENTINEL)
                .await,
            "region": session
                .nth_text_or(sel.table_cells, sel.region_index, NOT_FOUND_SENTINEL)
                .await,
            "status": session.text_or(sel.status, NOT_FOUND_SENTINEL).await,
            "balance": session
                .nth_text_or(sel.table_cells, sel.balance_index, NOT_FOUND_SENTINEL)
                .await,
        });

        Ok(vec![account])
    }
}

#[async_trait]
impl ProviderDriver for WaterDriver {
    fn service(&self) -> ServiceKind {
        ServiceKind::Water
    }

    async fn scrape(&self, username: &str, password: &str) -> Result<Vec<Value>, ScrapeError> {
        let session = PortalSession::launch(&self.scraper).await?;
        let outcome = self.run(&session, username, password).await;
        session.close().await;
        outcome
    }
}
