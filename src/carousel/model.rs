//! Core data types: sliders, their settings, and the slides they own.
//!
//! A [`Slider`] is addressed by a human-chosen slug that never changes once
//! created. A [`Slide`] is addressed by a store-generated numeric id and
//! belongs to exactly one slider; its `order` value sorts it within that
//! slider but is not guaranteed to be contiguous (see [`crate::ordering`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type SlideId = u64;
pub type AssetId = u64;

pub const INTERVAL_MIN: u32 = 1000;
pub const INTERVAL_MAX: u32 = 30000;
pub const INTERVAL_DEFAULT: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    Slide,
    Crossfade,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Slide => "slide",
            Transition::Crossfade => "crossfade",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slide" => Some(Transition::Slide),
            "crossfade" => Some(Transition::Crossfade),
            _ => None,
        }
    }
}

/// How the image fills the carousel frame (CSS `object-fit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    None,
}

impl ImageFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cover" => Some(ImageFit::Cover),
            "contain" => Some(ImageFit::Contain),
            "none" => Some(ImageFit::None),
            _ => None,
        }
    }
}

/// Image height policy: natural height, or a fixed positive pixel height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ImageHeight {
    #[default]
    Auto,
    Pixels(u32),
}

impl ImageHeight {
    pub fn pixels(&self) -> Option<u32> {
        match self {
            ImageHeight::Auto => None,
            ImageHeight::Pixels(px) => Some(*px),
        }
    }
}

impl fmt::Display for ImageHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageHeight::Auto => write!(f, "auto"),
            ImageHeight::Pixels(px) => write!(f, "{}", px),
        }
    }
}

impl FromStr for ImageHeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(ImageHeight::Auto);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(px) = s.parse::<u32>() {
                if px > 0 {
                    return Ok(ImageHeight::Pixels(px));
                }
            }
        }
        Err(format!("Invalid image height: {}", s))
    }
}

impl From<ImageHeight> for String {
    fn from(height: ImageHeight) -> Self {
        height.to_string()
    }
}

impl TryFrom<String> for ImageHeight {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The fixed set of button classes a call-to-action may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ButtonStyle {
    #[default]
    #[serde(rename = "btn-primary")]
    Primary,
    #[serde(rename = "btn-secondary")]
    Secondary,
    #[serde(rename = "btn-success")]
    Success,
    #[serde(rename = "btn-danger")]
    Danger,
    #[serde(rename = "btn-warning")]
    Warning,
    #[serde(rename = "btn-info")]
    Info,
    #[serde(rename = "btn-light")]
    Light,
    #[serde(rename = "btn-dark")]
    Dark,
}

impl ButtonStyle {
    pub const ALL: [ButtonStyle; 8] = [
        ButtonStyle::Primary,
        ButtonStyle::Secondary,
        ButtonStyle::Success,
        ButtonStyle::Danger,
        ButtonStyle::Warning,
        ButtonStyle::Info,
        ButtonStyle::Light,
        ButtonStyle::Dark,
    ];

    pub fn as_class(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "btn-primary",
            ButtonStyle::Secondary => "btn-secondary",
            ButtonStyle::Success => "btn-success",
            ButtonStyle::Danger => "btn-danger",
            ButtonStyle::Warning => "btn-warning",
            ButtonStyle::Info => "btn-info",
            ButtonStyle::Light => "btn-light",
            ButtonStyle::Dark => "btn-dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_class() == s)
    }
}

/// Display and behavior settings of a slider.
///
/// `Default` is the defaults table applied to a brand-new slider for every
/// field the request did not supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderSettings {
    pub active: bool,
    pub indicators: bool,
    pub controls: bool,
    pub autoplay: bool,
    pub interval: u32,
    pub keyboard: bool,
    pub touch: bool,
    pub pause_on_hover: bool,
    pub wrap: bool,
    pub transition: Transition,
    pub image_height: ImageHeight,
    pub image_fit: ImageFit,
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            active: true,
            indicators: true,
            controls: true,
            autoplay: true,
            interval: INTERVAL_DEFAULT,
            keyboard: true,
            touch: true,
            pause_on_hover: true,
            wrap: true,
            transition: Transition::Slide,
            image_height: ImageHeight::Auto,
            image_fit: ImageFit::Cover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slider {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub settings: SliderSettings,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Slider {
    /// The placeholder a page author pastes to embed this slider.
    pub fn embed_snippet(&self, tag: &str) -> String {
        format!("[{} id=\"{}\"]", tag, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRef {
    pub asset_id: AssetId,
    /// Derived from `asset_id` through the asset resolver on every write.
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Caption {
    pub enabled: bool,
    pub title: String,
    pub text: String,
}

impl Caption {
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallToAction {
    pub enabled: bool,
    pub text: String,
    pub url: String,
    pub style: ButtonStyle,
    pub new_tab: bool,
}

impl CallToAction {
    /// A button is only shown when it is enabled and has both a label and a target.
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.text.is_empty() && !self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub slider_id: String,
    pub order: u32,
    pub image: ImageRef,
    pub caption: Caption,
    pub cta: CallToAction,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_height_parses_auto_and_pixels() {
        assert_eq!("auto".parse::<ImageHeight>(), Ok(ImageHeight::Auto));
        assert_eq!("480".parse::<ImageHeight>(), Ok(ImageHeight::Pixels(480)));
        assert!("0".parse::<ImageHeight>().is_err());
        assert!("-4".parse::<ImageHeight>().is_err());
        assert!("12px".parse::<ImageHeight>().is_err());
    }

    #[test]
    fn image_height_serializes_as_string() {
        let json = serde_json::to_string(&ImageHeight::Pixels(320)).unwrap();
        assert_eq!(json, "\"320\"");
        let parsed: ImageHeight = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, ImageHeight::Auto);
    }

    #[test]
    fn button_style_round_trips_through_class_name() {
        for style in ButtonStyle::ALL {
            assert_eq!(ButtonStyle::parse(style.as_class()), Some(style));
        }
        assert_eq!(ButtonStyle::parse("btn-link"), None);
    }

    #[test]
    fn cta_needs_label_and_target_to_be_visible() {
        let mut cta = CallToAction {
            enabled: true,
            text: "Go".into(),
            url: String::new(),
            ..Default::default()
        };
        assert!(!cta.is_visible());
        cta.url = "https://example.com".into();
        assert!(cta.is_visible());
        cta.enabled = false;
        assert!(!cta.is_visible());
    }

    #[test]
    fn slider_settings_flatten_into_slider_json() {
        let now = Utc::now();
        let slider = Slider {
            id: "home".into(),
            name: "Home".into(),
            settings: SliderSettings::default(),
            created_at: now,
            modified_at: now,
        };
        let value = serde_json::to_value(&slider).unwrap();
        assert_eq!(value["interval"], 5000);
        assert_eq!(value["transition"], "slide");
        assert_eq!(value["image_height"], "auto");
    }
}
