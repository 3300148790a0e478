use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::prediction::{
    CategoryPolicyKind, PredictionConfig, DEFAULT_CANONICAL_ROUNDS, DEFAULT_ELIGIBILITY_WINDOW,
    DEFAULT_TREND_LENIENCY,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub prediction: PredictionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog = CatalogConfig {
            snapshot_path: optional_path("CATALOG_PATH"),
            alias_table_path: optional_path("PREDICTION_ALIAS_TABLE"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog,
            prediction: load_prediction_config()?,
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn load_prediction_config() -> Result<PredictionConfig, ConfigError> {
    let eligibility_window = match env::var("PREDICTION_WINDOW") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(ConfigError::InvalidWindow(raw))?,
        Err(_) => DEFAULT_ELIGIBILITY_WINDOW,
    };

    let canonical_rounds = match env::var("PREDICTION_CANONICAL_ROUNDS") {
        Ok(raw) => raw
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidCanonicalRounds(raw))?,
        Err(_) => DEFAULT_CANONICAL_ROUNDS,
    };

    let category_policy = match env::var("PREDICTION_CATEGORY_POLICY") {
        Ok(raw) => {
            CategoryPolicyKind::parse(&raw).ok_or(ConfigError::UnknownCategoryPolicy(raw))?
        }
        Err(_) => CategoryPolicyKind::Open,
    };

    Ok(PredictionConfig {
        eligibility_window,
        canonical_rounds,
        trend_leniency: DEFAULT_TREND_LENIENCY,
        category_policy,
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the catalog snapshot and alias overrides live. Both are optional.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub snapshot_path: Option<PathBuf>,
    pub alias_table_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWindow(String),
    InvalidCanonicalRounds(String),
    UnknownCategoryPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWindow(raw) => write!(
                f,
                "PREDICTION_WINDOW must be a non-negative number of percentile points (found '{raw}')"
            ),
            ConfigError::InvalidCanonicalRounds(raw) => write!(
                f,
                "PREDICTION_CANONICAL_ROUNDS must be an integer between 1 and 255 (found '{raw}')"
            ),
            ConfigError::UnknownCategoryPolicy(raw) => write!(
                f,
                "PREDICTION_CATEGORY_POLICY must be 'open' or 'declared' (found '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWindow(_)
            | ConfigError::InvalidCanonicalRounds(_)
            | ConfigError::UnknownCategoryPolicy(_) => None,
        }
    }
}
