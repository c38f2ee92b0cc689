//! # Configuration
//!
//! Per-installation settings, stored as `config.json` in the data directory.
//! A missing file means defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `asset-url-template` | unset | Fallback URL for unknown asset ids, `{id}` is substituted |
//! | `embed-tag` | `carousel` | Placeholder tag expanded in pages (`[carousel id="..."]`) |
//! | `token-secret` | generated | Signing secret for mutation tokens, never displayed |

use crate::embed::{is_valid_tag, DEFAULT_TAG, MSG_TAG_FORMAT};
use crate::error::{CarouselError, Result};
use crate::security::generate_secret;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const KEYS: &[&str] = &["asset-url-template", "embed-tag", "token-secret"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarouselConfig {
    #[serde(default)]
    pub asset_url_template: Option<String>,

    #[serde(default = "default_embed_tag")]
    pub embed_tag: String,

    #[serde(default)]
    pub token_secret: String,
}

fn default_embed_tag() -> String {
    DEFAULT_TAG.to_string()
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            asset_url_template: None,
            embed_tag: default_embed_tag(),
            token_secret: String::new(),
        }
    }
}

impl CarouselConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CarouselError::Io)?;
        let config: CarouselConfig =
            serde_json::from_str(&content).map_err(CarouselError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CarouselError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CarouselError::Serialization)?;
        fs::write(config_path, content).map_err(CarouselError::Io)?;
        Ok(())
    }

    /// Generates a signing secret if there is none yet. Returns true when one was generated.
    pub fn ensure_secret(&mut self) -> bool {
        if !self.token_secret.is_empty() {
            return false;
        }
        self.token_secret = generate_secret();
        true
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "asset-url-template" => Some(self.asset_url_template.clone().unwrap_or_default()),
            "embed-tag" => Some(self.embed_tag.clone()),
            "token-secret" => Some(if self.token_secret.is_empty() {
                "(not set)".to_string()
            } else {
                "(hidden)".to_string()
            }),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "asset-url-template" => {
                if value.is_empty() {
                    self.asset_url_template = None;
                } else if !value.contains("{id}") {
                    return Err("asset-url-template must contain {id}".to_string());
                } else {
                    self.asset_url_template = Some(value.to_string());
                }
                Ok(())
            }
            "embed-tag" => {
                if !is_valid_tag(value) {
                    return Err(MSG_TAG_FORMAT.to_string());
                }
                self.embed_tag = value.to_string();
                Ok(())
            }
            "token-secret" => Err("token-secret is generated and cannot be set".to_string()),
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }

    /// Displayable key/value pairs, secret masked.
    pub fn entries(&self) -> Vec<(String, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}
