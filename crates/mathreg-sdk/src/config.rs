use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Session configuration, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of buckets in the binding table. Fixed once the table exists.
    pub table_capacity: usize,
    /// Default log level for the command-line front end.
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            table_capacity: 256,
            log_level: "warn".into(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.table_capacity, 256);
        assert_eq!(c.log_level, "warn");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let c = SessionConfig::from_toml_str("table_capacity = 8\n").unwrap();
        assert_eq!(c.table_capacity, 8);
        assert_eq!(c.log_level, "warn");
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = SessionConfig::from_toml_str("buckets = 8\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table_capacity = 32").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let c = SessionConfig::load(file.path()).unwrap();
        assert_eq!(c.table_capacity, 32);
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Io(_)));
    }
}
