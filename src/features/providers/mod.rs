//! Provider automation layer.
//!
//! One driver per utility portal, all behind the same contract: log in with
//! the submitted credentials, pull the bill fields off the authenticated
//! pages, and hand back a sequence of raw entries. The telecom portal can
//! carry several open bills (one per connection); the electricity and water
//! portals always yield a one-element sequence.

pub mod drivers;
pub mod normalize;
pub mod session;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Closed set of provider services this system knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Electricity,
    Telecom,
    Water,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [
        ServiceKind::Electricity,
        ServiceKind::Telecom,
        ServiceKind::Water,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Electricity => "electricity",
            ServiceKind::Telecom => "telecom",
            ServiceKind::Water => "water",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "electricity" => Some(ServiceKind::Electricity),
            "telecom" => Some(ServiceKind::Telecom),
            "water" => Some(ServiceKind::Water),
            _ => None,
        }
    }

    /// Whether one authenticated session can yield more than one bill entry.
    pub fn multi_entry(&self) -> bool {
        matches!(self, ServiceKind::Telecom)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure at a fatal step of the automation state machine. Field-level
/// extraction misses are NOT represented here; they degrade to sentinels.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not start automation session: {0}")]
    Session(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("login was not accepted: {0}")]
    Login(String),

    #[error("automation command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("scrape did not finish within {0} seconds")]
    Timeout(u64),
}

/// One call is one attempt: no retries happen inside a driver, and the
/// underlying session is released on every exit path.
#[async_trait]
pub trait ProviderDriver: Send + Sync {
    fn service(&self) -> ServiceKind;

    async fn scrape(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<serde_json::Value>, ScrapeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_kind_round_trips_through_wire_names() {
        for kind in ServiceKind::ALL {
            assert_eq!(ServiceKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ServiceKind::parse("gas"), None);
    }

    #[test]
    fn only_telecom_yields_multiple_entries() {
        assert!(ServiceKind::Telecom.multi_entry());
        assert!(!ServiceKind::Electricity.multi_entry());
        assert!(!ServiceKind::Water.multi_entry());
    }
}
