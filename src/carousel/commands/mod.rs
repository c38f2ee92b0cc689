//! # Command Layer
//!
//! The business logic of carousel. Each operation lives in its own submodule
//! and is a plain function over a [`DataStore`](crate::store::DataStore).
//!
//! Commands:
//! - run sanitization, merge and ordering in that order, and only then write
//! - return a structured [`CmdResult`] instead of printing anything
//! - never check authorization (the API does that before dispatching here)
//!
//! Tests live next to each command and run against `InMemoryStore`.
//!
//! ## Command Modules
//!
//! - [`create_slider`], [`update_slider`], [`delete_slider`]: slider configurations
//! - [`list`], [`show`]: admin listings with counts and previews
//! - [`save_slide`], [`remove_slide`], [`toggle`], [`reorder`]: slides
//! - [`render`]: fragments and whole-page embed expansion
//! - [`doctor`]: consistency repair
//! - [`config`]: configuration get/set

use crate::config::CarouselConfig;
use crate::model::{Slide, Slider};
use crate::ordering::RankedSlide;
use crate::render::Fragment;
use serde::Serialize;

pub mod config;
pub mod create_slider;
pub mod delete_slider;
pub mod doctor;
pub mod list;
pub mod remove_slide;
pub mod render;
pub mod reorder;
pub mod save_slide;
pub mod show;
pub mod toggle;
pub mod update_slider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A slider as shown in the admin list.
#[derive(Debug, Clone, Serialize)]
pub struct SliderSummary {
    pub slider: Slider,
    pub total_slides: usize,
    pub active_slides: usize,
    pub embed: String,
}

/// What the caption column of a slide listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CaptionPreview {
    Content { title: String, excerpt: String },
    EnabledEmpty,
    Disabled,
}

impl CaptionPreview {
    pub fn label(&self) -> String {
        match self {
            CaptionPreview::Content { title, excerpt } => {
                match (title.is_empty(), excerpt.is_empty()) {
                    (false, false) => format!("{}: {}", title, excerpt),
                    (false, true) => title.clone(),
                    _ => excerpt.clone(),
                }
            }
            CaptionPreview::EnabledEmpty => "Caption enabled (no text)".to_string(),
            CaptionPreview::Disabled => "No caption".to_string(),
        }
    }
}

const EXCERPT_WORDS: usize = 15;

/// One row of a slide listing.
#[derive(Debug, Clone, Serialize)]
pub struct SlideRow {
    /// 0-based position in the display sequence.
    pub rank: usize,
    pub slide: Slide,
    pub caption: CaptionPreview,
    /// Button label, when the button is enabled and labelled.
    pub button: Option<String>,
}

impl SlideRow {
    pub fn from_ranked(ranked: RankedSlide) -> Self {
        let RankedSlide { rank, slide } = ranked;
        let caption = if !slide.caption.enabled {
            CaptionPreview::Disabled
        } else if slide.caption.has_content() {
            CaptionPreview::Content {
                title: slide.caption.title.clone(),
                excerpt: trim_words(&slide.caption.text, EXCERPT_WORDS),
            }
        } else {
            CaptionPreview::EnabledEmpty
        };
        let button =
            (slide.cta.enabled && !slide.cta.text.is_empty()).then(|| slide.cta.text.clone());
        Self {
            rank,
            slide,
            caption,
            button,
        }
    }
}

pub fn slide_rows(slides: Vec<Slide>) -> Vec<SlideRow> {
    crate::ordering::rank(slides)
        .into_iter()
        .map(SlideRow::from_ranked)
        .collect()
}

/// First `max` words of `text`, with an ellipsis when cut.
pub fn trim_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        words.join(" ")
    } else {
        format!("{}…", words[..max].join(" "))
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_sliders: Vec<Slider>,
    pub affected_slides: Vec<Slide>,
    pub listed_sliders: Vec<SliderSummary>,
    pub listed_slides: Vec<SlideRow>,
    pub fragments: Vec<Fragment>,
    /// Expanded page output from `render-page`.
    pub page: Option<String>,
    pub config: Option<CarouselConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_sliders(mut self, sliders: Vec<Slider>) -> Self {
        self.affected_sliders = sliders;
        self
    }

    pub fn with_affected_slides(mut self, slides: Vec<Slide>) -> Self {
        self.affected_slides = slides;
        self
    }

    pub fn with_listed_sliders(mut self, sliders: Vec<SliderSummary>) -> Self {
        self.listed_sliders = sliders;
        self
    }

    pub fn with_listed_slides(mut self, slides: Vec<SlideRow>) -> Self {
        self.listed_slides = slides;
        self
    }

    pub fn with_config(mut self, config: CarouselConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::new_slide_defaults;
    use chrono::Utc;

    fn row(configure: impl FnOnce(&mut Slide)) -> SlideRow {
        let mut slide = new_slide_defaults(1, "home", 0, Utc::now());
        configure(&mut slide);
        SlideRow::from_ranked(RankedSlide { rank: 0, slide })
    }

    #[test]
    fn caption_preview_labels() {
        assert_eq!(row(|_| {}).caption.label(), "No caption");
        assert_eq!(
            row(|s| s.caption.enabled = true).caption.label(),
            "Caption enabled (no text)"
        );
        let labelled = row(|s| {
            s.caption.enabled = true;
            s.caption.title = "Spring".into();
            s.caption.text = "Fresh arrivals".into();
        });
        assert_eq!(labelled.caption.label(), "Spring: Fresh arrivals");
    }

    #[test]
    fn disabled_caption_hides_its_text() {
        let hidden = row(|s| s.caption.title = "Spring".into());
        assert_eq!(hidden.caption, CaptionPreview::Disabled);
    }

    #[test]
    fn button_preview_needs_label() {
        assert_eq!(row(|s| s.cta.enabled = true).button, None);
        let shown = row(|s| {
            s.cta.enabled = true;
            s.cta.text = "Shop".into();
        });
        assert_eq!(shown.button.as_deref(), Some("Shop"));
    }

    #[test]
    fn trim_words_cuts_long_text() {
        assert_eq!(trim_words("one  two\nthree", 5), "one two three");
        assert_eq!(trim_words("a b c d", 2), "a b…");
    }
}
