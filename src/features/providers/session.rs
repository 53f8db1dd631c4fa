use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use crate::core::config::ScraperConfig;
use crate::features::providers::ScrapeError;

/// Thin wrapper over a WebDriver session with the two primitives every
/// driver needs: bounded readiness waits and best-effort field reads.
pub struct PortalSession {
    client: Client,
    patience: Duration,
    poll: Duration,
}

impl PortalSession {
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless=new",
                    "--window-size=1920,1080",
                    "--disable-gpu",
                    "--no-sandbox",
                    "--disable-setuid-sandbox",
                    "--disable-blink-features=AutomationControlled",
                    format!("--user-agent={}", config.user_agent),
                ]
            }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| ScrapeError::Session(e.to_string()))?;

        Ok(Self {
            client,
            patience: Duration::from_secs(config.wait_timeout_secs),
            poll: Duration::from_millis(config.poll_interval_ms),
        })
    }

    pub async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// Wait until the element is present. Content behind these portals
    /// renders asynchronously after navigation settles.
    pub async fn wait_for(&self, selector: &str) -> Result<Element, ScrapeError> {
        Ok(self
            .client
            .wait()
            .at_most(self.patience)
            .every(self.poll)
            .for_element(Locator::Css(selector))
            .await?)
    }

    pub async fn fill(&self, selector: &str, value: &str) -> Result<(), ScrapeError> {
        let field = self.wait_for(selector).await?;
        field.clear().await?;
        field.send_keys(value).await?;
        Ok(())
    }

    pub async fn click(&self, selector: &str) -> Result<(), ScrapeError> {
        let target = self.wait_for(selector).await?;
        target.click().await?;
        Ok(())
    }

    /// Click only if the element is on the page (consent dialogs that appear
    /// for fresh sessions only). Absence is not a failure.
    pub async fn click_if_present(&self, selector: &str) -> Result<bool, ScrapeError> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(elem) => {
                elem.click().await?;
                Ok(true)
            }
            Err(e) if e.is_no_such_element() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Wait until the browser has left `from_url` after a login submission.
    /// Staying put means the portal rejected the credentials (or never
    /// finished authenticating).
    pub async fn await_departure(&self, from_url: &str) -> Result<(), ScrapeError> {
        let deadline = tokio::time::Instant::now() + self.patience;
        loop {
            let current = self.client.current_url().await?;
            if !current.as_str().starts_with(from_url) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::Login(format!(
                    "still on {} after submitting credentials",
                    from_url
                )));
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    /// Best-effort single-field read: markup drift degrades to the sentinel.
    pub async fn text_or(&self, selector: &str, sentinel: &str) -> String {
        match self.client.find(Locator::Css(selector)).await {
            Ok(elem) => elem
                .text()
                .await
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|_| sentinel.to_string()),
            Err(_) => sentinel.to_string(),
        }
    }

    /// Best-effort read of the n-th match of a selector.
    pub async fn nth_text_or(&self, selector: &str, index: usize, sentinel: &str) -> String {
        match self.client.find_all(Locator::Css(selector)).await {
            Ok(elems) => match elems.get(index) {
                Some(elem) => elem
                    .text()
                    .await
                    .map(|t| t.trim().to_string())
                    .unwrap_or_else(|_| sentinel.to_string()),
                None => sentinel.to_string(),
            },
            Err(_) => sentinel.to_string(),
        }
    }

    pub async fn find_all(&self, selector: &str) -> Result<Vec<Element>, ScrapeError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    /// Best-effort read scoped inside a card/row element.
    pub async fn scoped_text_or(element: &Element, selector: &str, sentinel: &str) -> String {
        match element.find(Locator::Css(selector)).await {
            Ok(elem) => elem
                .text()
                .await
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|_| sentinel.to_string()),
            Err(_) => sentinel.to_string(),
        }
    }

    /// Release the session. Close failures are logged, not surfaced: by this
    /// point the scrape outcome is already decided.
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!("Failed to close automation session cleanly: {}", e);
        }
    }
}
