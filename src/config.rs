//! Environment-based configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file through `dotenvy`.

use std::env;
use thiserror::Error;

use crate::invoice::form::DEFAULT_OPTOMETRIST;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where invoices are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Values printed on receipts when the form does not supply them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicDefaults {
    pub location: String,
    pub receiver: String,
    pub optometrist: String,
}

impl Default for ClinicDefaults {
    fn default() -> Self {
        Self {
            location: "Bekasi".to_string(),
            receiver: "Nursafaat, Amd.RO".to_string(),
            optometrist: DEFAULT_OPTOMETRIST.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub typst_bin: String,
    pub clinic: ClinicDefaults,
    pub allowed_origins: Vec<String>,
}

const DEFAULT_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            store: StoreBackend::Memory,
            database_url: None,
            typst_bin: "typst".to_string(),
            clinic: ClinicDefaults::default(),
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("INVOICE_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "INVOICE_STORE",
                    value: other.to_string(),
                })
            }
        };

        let database_url = get("DATABASE_URL");
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => defaults.port,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            store,
            database_url,
            typst_bin: get("TYPST_BIN").unwrap_or(defaults.typst_bin),
            clinic: ClinicDefaults {
                location: get("CLINIC_LOCATION").unwrap_or(defaults.clinic.location),
                receiver: get("CLINIC_RECEIVER").unwrap_or(defaults.clinic.receiver),
                optometrist: get("DEFAULT_OPTOMETRIST").unwrap_or(defaults.clinic.optometrist),
            },
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let result = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_memory_store_with_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("INVOICE_STORE", "memory")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.typst_bin, "typst");
        assert_eq!(config.clinic.location, "Bekasi");
        assert_eq!(config.clinic.optometrist, "Kholidin, A.Md.RO");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/optik"),
            ("PORT", "9090"),
            ("CLINIC_LOCATION", "Cikarang"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreBackend::Postgres);
        assert_eq!(config.port, 9090);
        assert_eq!(config.clinic.location, "Cikarang");
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup(&[("INVOICE_STORE", "memory"), ("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }
}
