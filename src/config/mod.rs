use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::SeatGrid;

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
    pub credentials: CredentialConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
    /// `text` or `json`
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Pricing and seat layout shared by every showing
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub unit_price: i64,
    pub grid: SeatGrid,
    /// City reported when the caller asks for location auto-detection.
    pub default_city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid value, got {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} is out of range: {reason}")]
    OutOfRange { var: &'static str, reason: String },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            rust_log: "ticket_booking=debug,sqlx=warn".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://ticket_booking.db".to_string(),
            pool_size: 5,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            unit_price: 50_000,
            grid: SeatGrid::default(),
            default_city: "Bandung".to_string(),
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

fn var_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(var: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(var, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rows: u8 = parse_var("SEAT_GRID_ROWS", "6")?;
        let columns: u16 = parse_var("SEAT_GRID_COLUMNS", "10")?;
        let grid = SeatGrid::new(rows, columns).map_err(|reason| ConfigError::OutOfRange {
            var: "SEAT_GRID_ROWS/SEAT_GRID_COLUMNS",
            reason,
        })?;

        let unit_price: i64 = parse_var("TICKET_UNIT_PRICE", "50000")?;
        if unit_price <= 0 {
            return Err(ConfigError::OutOfRange {
                var: "TICKET_UNIT_PRICE",
                reason: "must be > 0".to_string(),
            });
        }

        let log_format = var_or("LOG_FORMAT", "text").to_lowercase();
        if log_format != "text" && log_format != "json" {
            return Err(ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: log_format,
            });
        }

        let pool_size: u32 = parse_var("DB_POOL_SIZE", "5")?;
        if pool_size == 0 {
            return Err(ConfigError::OutOfRange {
                var: "DB_POOL_SIZE",
                reason: "must be > 0".to_string(),
            });
        }

        Ok(Config {
            app: AppConfig {
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "ticket_booking=debug,sqlx=warn"),
                log_format,
            },
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite://ticket_booking.db"),
                pool_size,
            },
            booking: BookingConfig {
                unit_price,
                grid,
                default_city: var_or("DEFAULT_CITY", "Bandung"),
            },
            credentials: CredentialConfig {
                output_dir: PathBuf::from(var_or("CREDENTIAL_DIR", ".")),
            },
        })
    }

    /// Configuration for a throwaway in-memory store, used by tests and demos.
    pub fn in_memory() -> Self {
        Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                pool_size: 1,
            },
            ..Config::default()
        }
    }
}
