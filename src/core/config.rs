use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Tuning for the WebDriver sessions the provider drivers run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// WebDriver endpoint (chromedriver/geckodriver).
    pub webdriver_url: String,
    /// User agent presented to the portals.
    pub user_agent: String,
    /// Patience for a single readiness condition (element present,
    /// navigation away from the login page).
    pub wait_timeout_secs: u64,
    /// Polling interval while a readiness condition is pending.
    pub poll_interval_ms: u64,
    /// Hard ceiling on one whole driver invocation.
    pub scrape_timeout_secs: u64,
    /// Concurrent automation sessions allowed per provider.
    pub sessions_per_provider: usize,
}

/// Login and account page per provider portal. Selector sets live with the
/// drivers; only the endpoints are expected to need per-deployment overrides.
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub electricity: PortalEndpoints,
    pub telecom: PortalEndpoints,
    pub water: PortalEndpoints,
}

#[derive(Debug, Clone)]
pub struct PortalEndpoints {
    pub login_url: String,
    pub account_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            scraper: ScraperConfig::from_env()?,
            providers: ProvidersConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8082".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // SQLite is intentionally single-writer: the store itself serializes
    // concurrent submissions.
    const DEFAULT_MAX_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://logario.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
        })
    }
}

impl ScraperConfig {
    const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_POLL_INTERVAL_MS: u64 = 400;
    const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 90;
    const DEFAULT_SESSIONS_PER_PROVIDER: usize = 2;

    // Portals serve degraded markup to obvious automation.
    const DEFAULT_USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36";

    pub fn from_env() -> Result<Self, String> {
        let webdriver_url =
            env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:4444".to_string());

        let user_agent =
            env::var("SCRAPER_USER_AGENT").unwrap_or_else(|_| Self::DEFAULT_USER_AGENT.to_string());

        let wait_timeout_secs = env::var("SCRAPER_WAIT_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_WAIT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SCRAPER_WAIT_TIMEOUT_SECS must be a valid number".to_string())?;

        let poll_interval_ms = env::var("SCRAPER_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_POLL_INTERVAL_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "SCRAPER_POLL_INTERVAL_MS must be a valid number".to_string())?;

        let scrape_timeout_secs = env::var("SCRAPE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SCRAPE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SCRAPE_TIMEOUT_SECS must be a valid number".to_string())?;

        let sessions_per_provider = env::var("SCRAPER_SESSIONS_PER_PROVIDER")
            .unwrap_or_else(|_| Self::DEFAULT_SESSIONS_PER_PROVIDER.to_string())
            .parse::<usize>()
            .map_err(|_| "SCRAPER_SESSIONS_PER_PROVIDER must be a valid number".to_string())?;

        Ok(Self {
            webdriver_url,
            user_agent,
            wait_timeout_secs,
            poll_interval_ms,
            scrape_timeout_secs,
            sessions_per_provider,
        })
    }
}

impl ProvidersConfig {
    pub fn from_env() -> Self {
        Self {
            electricity: PortalEndpoints {
                login_url: env::var("ELECTRICITY_LOGIN_URL")
                    .unwrap_or_else(|_| "https://mydei.dei.gr/el/login/".to_string()),
                account_url: env::var("ELECTRICITY_ACCOUNT_URL")
                    .unwrap_or_else(|_| "https://mydei.dei.gr/el/".to_string()),
            },
            telecom: PortalEndpoints {
                login_url: env::var("TELECOM_LOGIN_URL")
                    .unwrap_or_else(|_| "https://account.cosmote.gr/el/user-login".to_string()),
                account_url: env::var("TELECOM_ACCOUNT_URL").unwrap_or_else(|_| {
                    "https://my.cosmote.gr/selfcare/jsp/dashboard.jsp".to_string()
                }),
            },
            water: PortalEndpoints {
                login_url: env::var("WATER_LOGIN_URL")
                    .unwrap_or_else(|_| "https://deyaponline.gr/login".to_string()),
                account_url: env::var("WATER_ACCOUNT_URL").unwrap_or_else(|_| {
                    "https://deyaponline.gr/water-account-user-login-redirect/accountinfo"
                        .to_string()
                }),
            },
        }
    }
}
