//! Service settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

/// Database file used when `PAYROLL_DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "./data/payroll.db";

/// Document directory used when `PAYROLL_DOCUMENTS_DIR` is unset.
pub const DEFAULT_DOCUMENTS_DIR: &str = "./data/documents";

/// Listen address used when `PAYROLL_HTTP_ADDR` is unset.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Rule-set file used when `PAYROLL_RULES_PATH` is unset.
pub const DEFAULT_RULES_PATH: &str = "./config/default.yaml";

/// Runtime settings for the payroll service binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory where rendered documents are written.
    pub documents_dir: PathBuf,
    /// HTTP listen address.
    pub http_addr: SocketAddr,
    /// Rule set activated when the store has no effective configuration.
    pub rules_path: PathBuf,
}

impl ServiceSettings {
    /// Reads settings from `PAYROLL_*` environment variables, falling back
    /// to the defaults above.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let read = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let http_addr_raw = read("PAYROLL_HTTP_ADDR", DEFAULT_HTTP_ADDR);
        let http_addr = http_addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| EngineError::ConfigParseError {
                path: "PAYROLL_HTTP_ADDR".to_string(),
                message: format!("'{}': {}", http_addr_raw, e),
            })?;

        Ok(Self {
            database_path: read("PAYROLL_DATABASE_PATH", DEFAULT_DATABASE_PATH).into(),
            documents_dir: read("PAYROLL_DOCUMENTS_DIR", DEFAULT_DOCUMENTS_DIR).into(),
            http_addr,
            rules_path: read("PAYROLL_RULES_PATH", DEFAULT_RULES_PATH).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let settings = ServiceSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(settings.http_addr.port(), 3000);
    }

    #[test]
    fn test_overrides_are_applied() {
        let vars: HashMap<&str, &str> = [
            ("PAYROLL_DATABASE_PATH", "/tmp/p.db"),
            ("PAYROLL_HTTP_ADDR", "127.0.0.1:8088"),
        ]
        .into_iter()
        .collect();

        let settings =
            ServiceSettings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.database_path, PathBuf::from("/tmp/p.db"));
        assert_eq!(settings.http_addr.port(), 8088);
        assert_eq!(settings.documents_dir, PathBuf::from(DEFAULT_DOCUMENTS_DIR));
    }

    #[test]
    fn test_bad_address_is_a_parse_error() {
        let result = ServiceSettings::from_lookup(|k| {
            (k == "PAYROLL_HTTP_ADDR").then(|| "not-an-address".to_string())
        });
        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "PAYROLL_HTTP_ADDR");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
