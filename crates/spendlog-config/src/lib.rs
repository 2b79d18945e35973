//! Configuration management for spendlog
//!
//! This module handles loading, validation, and management of
//! spendlog configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;
use error::ConfigResult;

// ==================== Configuration Types ====================

/// Storage location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value slots
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Slot key for the expense list
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_storage_key() -> String {
    "financeTracker_expenses".to_string()
}

/// Labels offered for payment modes and categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpensesConfig {
    #[serde(default = "default_payment_modes")]
    pub payment_modes: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Reject labels that are not in the lists above
    #[serde(default = "default_true")]
    pub enforce_vocabulary: bool,
}

impl Default for ExpensesConfig {
    fn default() -> Self {
        Self {
            payment_modes: default_payment_modes(),
            categories: default_categories(),
            enforce_vocabulary: true,
        }
    }
}

fn default_payment_modes() -> Vec<String> {
    ["cash", "card", "upi", "netbanking"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_categories() -> Vec<String> {
    ["food", "transport", "shopping", "bills", "entertainment", "health", "other"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Time range configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeRangeConfig {
    /// Range applied to `list` and `summary` when no dates are given
    #[serde(default)]
    pub default_range: TimeRange,
}

/// Time range enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Current month
    Month,
    /// Current calendar quarter
    Quarter,
    /// Current year
    Year,
    /// All time
    All,
    /// Custom range
    Custom,
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::All
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            "custom" => Ok(TimeRange::Custom),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Custom => write!(f, "custom"),
        }
    }
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol shown next to amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "₹".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

impl Default for SymbolPosition {
    fn default() -> Self {
        SymbolPosition::Before
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub expenses: ExpensesConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub time_range: TimeRangeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.key".to_string(),
                reason: "Storage key must not be empty".to_string(),
            });
        }

        if self.storage.key.contains(|c: char| matches!(c, '/' | '\\' | '\0')) || self.storage.key == ".." {
            return Err(ConfigError::InvalidValue {
                field: "storage.key".to_string(),
                reason: "Storage key must be a plain name without path separators".to_string(),
            });
        }

        if self.expenses.enforce_vocabulary {
            if self.expenses.payment_modes.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "expenses.payment_modes".to_string(),
                    reason: "At least one payment mode is required when enforce_vocabulary is on".to_string(),
                });
            }
            if self.expenses.categories.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "expenses.categories".to_string(),
                    reason: "At least one category is required when enforce_vocabulary is on".to_string(),
                });
            }
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.time_range.default_range == TimeRange::Custom {
            return Err(ConfigError::InvalidValue {
                field: "time_range.default_range".to_string(),
                reason: "Default range must be one of month, quarter, year, all".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// The bundled default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Write the default configuration to `path`
    pub fn write_default(path: &Path, overwrite: bool) -> ConfigResult<()> {
        if path.exists() && !overwrite {
            return Err(ConfigError::InvalidValue {
                field: path.display().to_string(),
                reason: "File already exists, pass --force to overwrite".to_string(),
            });
        }

        std::fs::write(path, Self::generate_default())
            .map_err(|e| ConfigError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.storage.key, "financeTracker_expenses");
        assert_eq!(config.expenses.payment_modes.len(), 4);
        assert_eq!(config.currency.symbol, "₹");
        assert_eq!(config.time_range.default_range, TimeRange::All);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("currency:\n  symbol: \"$\"\n").unwrap();
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.storage.path, PathBuf::from("./data"));
        assert!(config.expenses.enforce_vocabulary);
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let err = Config::from_yaml("storage:\n  key: \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "storage.key"));
    }

    #[test]
    fn test_validate_rejects_path_in_key() {
        let err = Config::from_yaml("storage:\n  key: ../elsewhere\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "storage.key"));
    }

    #[test]
    fn test_validate_rejects_custom_default_range() {
        let err = Config::from_yaml("time_range:\n  default_range: custom\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_rejects_too_many_decimal_places() {
        assert!(Config::from_yaml("currency:\n  decimal_places: 10\n").is_ok());

        let err = Config::from_yaml("currency:\n  decimal_places: 11\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, reason } => {
                assert_eq!(field, "currency.decimal_places");
                assert_eq!(reason, "Decimal places must be between 0 and 10");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_vocabulary_allowed_when_not_enforced() {
        let yaml = "expenses:\n  payment_modes: []\n  categories: []\n  enforce_vocabulary: false\n";
        assert!(Config::from_yaml(yaml).is_ok());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("storage: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        Config::write_default(&path, false).unwrap();
        assert!(Config::load(&path).is_ok());
        assert!(Config::write_default(&path, false).is_err());
        assert!(Config::write_default(&path, true).is_ok());
    }

    #[test]
    fn test_time_range_from_str() {
        assert_eq!("month".parse::<TimeRange>().unwrap(), TimeRange::Month);
        assert_eq!("Quarter".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert_eq!("year".parse::<TimeRange>().unwrap(), TimeRange::Year);
        assert_eq!("all".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("fortnight".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Quarter.to_string(), "quarter");
    }
}
