use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::config::{PortalEndpoints, ScraperConfig};
use crate::features::providers::session::PortalSession;
use crate::features::providers::{ProviderDriver, ScrapeError, ServiceKind};
use crate::shared::constants::NOT_FOUND_SENTINEL;

/// Selector set for the electricity portal, isolated here so markup drift
/// stays a one-struct change.
#[derive(Debug, Clone)]
pub struct ElectricitySelectors {
    pub cookie_accept: &'static str,
    pub username_input: &'static str,
    pub password_input: &'static str,
    pub submit_button: &'static str,
    pub account_number: &'static str,
    pub address: &'static str,
    pub due_date_entries: &'static str,
    /// The dashboard repeats the summary list; the due date sits third.
    pub due_date_index: usize,
    pub payment_amount: &'static str,
}

impl Default for ElectricitySelectors {
    fn default() -> Self {
        Self {
            cookie_accept: "#onetrust-accept-btn-handler",
            username_input: "#loginModel_Username",
            password_input: "#loginModel_Password",
            submit_button: "button[type='submit']",
            account_number: ".e-card-type__txt",
            address: ".b-card__title",
            due_date_entries: ".b-bill-sum-tiny__dd",
            due_date_index: 2,
            payment_amount: ".e-card-total__number",
        }
    }
}

/// Driver for the electricity utility portal: single-step login behind an
/// optional cookie-consent dialog, one bill summary per account.
pub struct ElectricityDriver {
    scraper: ScraperConfig,
    endpoints: PortalEndpoints,
    selectors: ElectricitySelectors,
}

impl ElectricityDriver {
    pub fn new(scraper: ScraperConfig, endpoints: PortalEndpoints) -> Self {
        Self {
            scraper,
            endpoints,
            selectors: ElectricitySelectors::default(),
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

        if session.click_if_present(sel.cookie_accept).await? {
            // the form re-renders once the overlay is gone
            session.wait_for(sel.username_input).await?;
        }

        session.fill(sel.username_input, username).await?;
        session.fill(sel.password_input, password).await?;
        session.click(sel.submit_button).await?;
        session.await_departure(&self.endpoints.login_url).await?;

        session.goto(&self.endpoints.account_url).await?;
        // The bill summary tile fills in after the page load; if it never
        // appears, extraction still runs and records sentinels.
        let _ = session.wait_for(sel.payment_amount).await;

        let bill = json!({
            "accountNumber": session.text_or(sel.account_number, NOT_FOUND_SENTINEL).await,
            "address": session.text_or(sel.address, NOT_FOUND_SENTINEL).await,
            "dueDate": session
                .nth_text_or(sel.due_date_entries, sel.due_date_index, NOT_FOUND_SENTINEL)
                .await,
            "paymentAmount": session.text_or(sel.payment_amount, NOT_FOUND_SENTINEL).await,
        });

        Ok(vec![bill])
    }
}

#[async_trait]
impl ProviderDriver for ElectricityDriver {
    fn service(&self) -> ServiceKind {
        ServiceKind::Electricity
    }

    async fn scrape(&self, username: &str, password: &str) -> Result<Vec<Value>, ScrapeError> {
        let session = PortalSession::launch(&self.scraper).await?;
        let outcome = self.run(&session, username, password).await;
        session.close().await;
        outcome
    }
}
