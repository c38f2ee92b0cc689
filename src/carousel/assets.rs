//! Asset resolution: numeric media ids to display URLs.
//!
//! Slides reference images by asset id. The URL stored next to the id is
//! always re-derived through an [`AssetResolver`] when the id is written, so
//! a stale URL never survives an edit.

use crate::error::{CarouselError, Result};
use crate::model::AssetId;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const ASSETS_FILE: &str = "assets.json";

pub trait AssetResolver {
    /// `None` when the id does not name a known asset.
    fn resolve(&self, id: AssetId) -> Option<String>;
}

/// Explicit id → URL entries, with an optional `{id}` URL template as fallback.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    urls: BTreeMap<AssetId, String>,
    url_template: Option<String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, id: AssetId, url: impl Into<String>) -> Self {
        self.urls.insert(id, url.into());
        self
    }

    pub fn with_url_template(mut self, template: Option<String>) -> Self {
        self.url_template = template.filter(|t| !t.trim().is_empty());
        self
    }

    /// Loads `assets.json` from `dir`. A missing file is an empty catalog.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(ASSETS_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(&path).map_err(CarouselError::Io)?;
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(CarouselError::Serialization)?;

        let mut urls = BTreeMap::new();
        for (key, url) in raw {
            match key.parse::<AssetId>() {
                Ok(id) if id > 0 => {
                    urls.insert(id, url);
                }
                _ => tracing::warn!(key = %key, "ignoring asset entry with a non-numeric id"),
            }
        }
        Ok(Self {
            urls,
            url_template: None,
        })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl AssetResolver for AssetCatalog {
    fn resolve(&self, id: AssetId) -> Option<String> {
        if id == 0 {
            return None;
        }
        if let Some(url) = self.urls.get(&id) {
            return Some(url.clone());
        }
        self.url_template
            .as_ref()
            .map(|template| template.replace("{id}", &id.to_string()))
    }
}
