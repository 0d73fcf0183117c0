use crate::error::{BillbookError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CURRENCY: &str = "$";

/// Configuration for billbook, stored in <data dir>/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct BillbookConfig {
    /// Symbol printed in front of amounts
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Ask before deleting records
    #[serde(default = "default_confirm_deletes")]
    pub confirm_deletes: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_confirm_deletes() -> bool {
    true
}

impl Default for BillbookConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            confirm_deletes: default_confirm_deletes(),
        }
    }
}

/// Keys accepted by `billbook config`.
pub const CONFIG_KEYS: &[&str] = &["currency", "confirm-deletes"];

impl BillbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BillbookError::Io)?;
        let config: BillbookConfig =
            serde_json::from_str(&content).map_err(BillbookError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BillbookError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BillbookError::Serialization)?;
        fs::write(config_path, content).map_err(BillbookError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "currency" => Some(self.currency.clone()),
            "confirm-deletes" => Some(self.confirm_deletes.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(BillbookError::Api("currency cannot be empty".into()));
                }
                self.currency = value.to_string();
            }
            "confirm-deletes" => {
                self.confirm_deletes = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(BillbookError::Api(format!(
                            "confirm-deletes expects true or false, got '{}'",
                            other
                        )));
                    }
                };
            }
            other => {
                return Err(BillbookError::Api(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}
