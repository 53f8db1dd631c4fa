use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::config::{PortalEndpoints, ScraperConfig};
use crate::features::providers::session::PortalSession;
use crate::features::providers::{ProviderDriver, ScrapeError, ServiceKind};

#[derive(Debug, Clone)]
pub struct TelecomSelectors {
    pub username_input: &'static str,
    pub next_button: &'static str,
    pub password_input: &'static str,
    pub bill_card: &'static str,
    pub connection: &'static str,
    pub bill_number: &'static str,
    pub amount_units: &'static str,
    pub amount_cents: &'static str,
    pub due_date: &'static str,
}

impl Default for TelecomSelectors {
    fn default() -> Self {
        Self {
            username_input: "#login",
            next_button: "#next",
            password_input: "#pwd",
            bill_card: ".cardWhite.withMargin.searchFilterBox",
            connection: ".cardLabelDropdownEntry div",
            bill_number: ".cardLabel div",
            amount_units: ".amountUnits",
            amount_cents: ".amountCents",
            due_date: ".cardText",
        }
    }
}

/// Driver for the telecom portal. Login is two-step (username first, the
/// password pane renders afterwards) and one authenticated dashboard can
/// carry several open bills, one card per connection.
pub struct TelecomDriver {
    scraper: ScraperConfig,
    endpoints: PortalEndpoints,
    selectors: TelecomSelectors,
}

impl TelecomDriver {
    pub fn new(scraper: ScraperConfig, endpoints: PortalEndpoints) -> Self {
        Self {
            scraper,
            endpoints,
            selectors: TelecomSelectors::default(),
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
        session.click(sel.next_button).await?;
        // the password pane is injected only after the username is accepted
        session.wait_for(sel.password_input).await?;
        session.fill(sel.password_input, password).await?;
        session.click(sel.next_button).await?;
        session.await_departure(&self.endpoints.login_url).await?;

        session.goto(&self.endpoints.account_url).await?;
        // Cards stream in well after the dashboard shell loads. An account
        // with no open bills never renders one, so a missed wait here means
        // an empty result, not a failure.
        let _ = session.wait_for(sel.bill_card).await;

        let cards = session.find_all(sel.bill_card).await?;
        let mut bills = Vec::with_capacity(cards.len());
        for card in &cards {
            let units = PortalSession::scoped_text_or(card, sel.amount_units, "0").await;
            let cents = PortalSession::scoped_text_or(card, sel.amount_cents, "00").await;

            bills.push(json!({
                "connection": PortalSession::scoped_text_or(card, sel.connection, "No connection").await,
                "billNumber": PortalSession::scoped_text_or(card, sel.bill_number, "No bill number").await,
                "totalAmount": format!("{},{}€", units, cents),
                "dueDate": PortalSession::scoped_text_or(card, sel.due_date, "No due date").await,
            }));
        }

        Ok(bills)
    }
}

#[async_trait]
impl ProviderDriver for TelecomDriver {
    fn service(&self) -> ServiceKind {
        ServiceKind::Telecom
    }

    async fn scrape(&self, username: &str, password: &str) -> Result<Vec<Value>, ScrapeError> {
        let session = PortalSession::launch(&self.scraper).await?;
        let outcome = self.run(&session, username, password).await;
        session.close().await;
        outcome
    }
}
