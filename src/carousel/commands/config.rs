use crate::commands::{CmdMessage, CmdResult};
use crate::config::CarouselConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = CarouselConfig::load(data_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = CarouselConfig::load(data_dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(value) => result.add_message(CmdMessage::info(value)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = CarouselConfig::load(data_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            config.save(data_dir)?;
            tracing::info!(key = %key, "config updated");

            let display = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    #[test]
    fn show_all_returns_defaults_when_no_file() {
        let temp = tempdir().unwrap();
        let result = run(temp.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap().embed_tag, "carousel");
    }

    #[test]
    fn set_persists_value() {
        let temp = tempdir().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("embed-tag".to_string(), "slider".to_string()),
        )
        .unwrap();
        assert!(result.messages[0].content.contains("embed-tag set to slider"));
        assert_eq!(CarouselConfig::load(temp.path()).unwrap().embed_tag, "slider");
    }

    #[test]
    fn show_key_never_prints_the_secret() {
        let temp = tempdir().unwrap();
        let mut config = CarouselConfig::default();
        config.ensure_secret();
        config.save(temp.path()).unwrap();

        let result = run(temp.path(), ConfigAction::ShowKey("token-secret".to_string())).unwrap();
        assert!(!result.messages[0].content.contains(&config.token_secret));
    }

    #[test]
    fn invalid_set_reports_error_and_writes_nothing() {
        let temp = tempdir().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("asset-url-template".to_string(), "https://cdn/x.jpg".to_string()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.config.is_none());
        assert!(!temp.path().join("config.json").exists());
    }

    #[test]
    fn unknown_key_is_an_error_message() {
        let temp = tempdir().unwrap();
        let result = run(temp.path(), ConfigAction::ShowKey("colour".to_string())).unwrap();
        assert!(result.messages[0].content.contains("Unknown config key: colour"));
    }
}
