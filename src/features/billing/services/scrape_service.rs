use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;

use crate::core::config::ScraperConfig;
use crate::features::providers::{ProviderDriver, ScrapeError, ServiceKind};

struct DriverSlot {
    driver: Arc<dyn ProviderDriver>,
    limiter: Arc<Semaphore>,
}

/// Dispatches a scrape request to the driver registered for its service.
/// Each provider gets its own admission semaphore so a burst of requests
/// cannot fan out into unbounded browser sessions, and every invocation
/// runs under one hard timeout.
pub struct ScrapeService {
    drivers: HashMap<ServiceKind, DriverSlot>,
    timeout: Duration,
}

impl ScrapeService {
    pub fn new(
        drivers: HashMap<ServiceKind, Arc<dyn ProviderDriver>>,
        config: &ScraperConfig,
    ) -> Self {
        let drivers = drivers
            .into_iter()
            .map(|(kind, driver)| {
                (
                    kind,
                    DriverSlot {
                        driver,
                        limiter: Arc::new(Semaphore::new(config.sessions_per_provider)),
                    },
                )
            })
            .collect();

        Self {
            drivers,
            timeout: Duration::from_secs(config.scrape_timeout_secs),
        }
    }

    /// One call is one attempt. On timeout the abandoned task keeps running
    /// to completion in the background: the session still gets closed and
    /// the admission permit is only released once the driver is done.
    pub async fn scrape(
        &self,
        service: ServiceKind,
        username: &str,
        password: &str,
    ) -> Result<Vec<Value>, ScrapeError> {
        let slot = self.drivers.get(&service).ok_or_else(|| {
            ScrapeError::Session(format!("no driver configured for service '{}'", service))
        })?;

        let permit = slot
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ScrapeError::Session("scrape limiter closed".to_string()))?;

        let driver = Arc::clone(&slot.driver);
        let username = username.to_string();
        let password = password.to_string();

        let attempt = tokio::spawn(async move {
            let _permit = permit;
            driver.scrape(&username, &password).await
        });

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(ScrapeError::Session(format!(
                "scrape task failed: {}",
                join_error
            ))),
            Err(_) => Err(ScrapeError::Timeout(self.timeout.as_secs())),
        }
    }
}
