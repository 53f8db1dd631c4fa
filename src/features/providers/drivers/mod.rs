mod electricity;
mod telecom;
mod water;

pub use electricity::ElectricityDriver;
pub use telecom::TelecomDriver;
pub use water::WaterDriver;

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::{ProvidersConfig, ScraperConfig};
use crate::features::providers::{ProviderDriver, ServiceKind};

/// Build the production driver set, one per supported service.
pub fn default_drivers(
    scraper: &ScraperConfig,
    providers: &ProvidersConfig,
) -> HashMap<ServiceKind, Arc<dyn ProviderDriver>> {
    let mut drivers: HashMap<ServiceKind, Arc<dyn ProviderDriver>> = HashMap::new();
    drivers.insert(
        ServiceKind::Electricity,
        Arc::new(ElectricityDriver::new(
            scraper.clone(),
            providers.electricity.clone(),
        )),
    );
    drivers.insert(
        ServiceKind::Telecom,
        Arc::new(TelecomDriver::new(scraper.clone(), providers.telecom.clone())),
    );
    drivers.insert(
        ServiceKind::Water,
        Arc::new(WaterDriver::new(scraper.clone(), providers.water.clone())),
    );
    drivers
}
