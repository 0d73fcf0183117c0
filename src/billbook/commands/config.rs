use crate::commands::paths::BillbookPaths;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::{BillbookConfig, CONFIG_KEYS};
use crate::error::{BillbookError, Result};

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &BillbookPaths, action: ConfigAction) -> Result<CmdResult> {
    let mut config = BillbookConfig::load(&paths.data_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            result = result.with_config(config);
        }
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(value) => result.add_message(CmdMessage::info(format!("{} = {}", key, value))),
            None => {
                return Err(BillbookError::Api(format!(
                    "Unknown config key: {} (known keys: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        },
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(&paths.data_dir)?;
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                config.get(&key).unwrap_or(value)
            )));
            result = result.with_config(config);
        }
    }

    Ok(result)
}
