//! # Render Engine
//!
//! Produces the HTML fragment for one embedded slider.
//!
//! A slider that is missing, inactive, or has no active slides renders as a
//! diagnostic HTML comment and nothing else. Otherwise the fragment is a
//! Bootstrap carousel whose element id is unique within the page: ids come
//! from a [`RenderContext`], one per page render.
//!
//! ## Escaping
//!
//! Markup comes from the templates in `templates/`, rendered with HTML
//! auto-escaping forced on for every value. Two filters handle the contexts
//! auto-escaping does not cover:
//!
//! - `url`: drops URLs with disallowed schemes, then escapes for an attribute
//! - `nl2br`: escapes plain text and turns its line breaks into `<br>`
//!
//! ## Behavior attributes
//!
//! The root element always carries explicit values for ride, interval,
//! keyboard, touch, pause, wrap and transition, so the output does not depend
//! on the client library's own defaults. With autoplay off the interval is
//! `false`.

use crate::error::Result;
use crate::escape;
use crate::model::{ImageFit, ImageHeight, Slide, Slider, Transition};
use crate::store::sort_slides;
use minijinja::{AutoEscape, Environment, Value};
use serde::Serialize;

pub const CAROUSEL_TEMPLATE: &str = include_str!("templates/carousel.html");
pub const CTA_TEMPLATE: &str = include_str!("templates/cta.html");

/// Ceiling for the image height on the narrowest viewports.
const NARROW_MAX_HEIGHT: f64 = 300.0;
const DEFAULT_ID_PREFIX: &str = "carousel";

/// Instance id allocation for one page.
#[derive(Debug, Clone)]
pub struct RenderContext {
    prefix: String,
    rendered: usize,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ID_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            rendered: 0,
        }
    }

    pub fn next_instance_id(&mut self, slug: &str) -> String {
        self.rendered += 1;
        format!("{}-{}-{}", self.prefix, slug, self.rendered)
    }

    /// Carousels rendered so far on this page.
    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

/// Why nothing was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    MissingId,
    NotFound(String),
    Inactive(String),
    NoActiveSlides(String),
    Failed(String),
}

impl EmptyReason {
    pub fn comment(&self) -> String {
        let detail = match self {
            EmptyReason::MissingId => "No slider ID provided".to_string(),
            EmptyReason::NotFound(id) => format!("Slider \"{}\" not found", escape::comment(id)),
            EmptyReason::Inactive(id) => format!("Slider \"{}\" is inactive", escape::comment(id)),
            EmptyReason::NoActiveSlides(id) => {
                format!("Slider \"{}\" has no active slides", escape::comment(id))
            }
            EmptyReason::Failed(id) => {
                format!("Slider \"{}\" could not be rendered", escape::comment(id))
            }
        };
        format!("<!-- Carousel: {} -->", detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Carousel { instance_id: String, html: String },
    Empty(EmptyReason),
}

impl Fragment {
    pub fn html(&self) -> String {
        match self {
            Fragment::Carousel { html, .. } => html.clone(),
            Fragment::Empty(reason) => reason.comment(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Fragment::Empty(_))
    }

    pub fn instance_id(&self) -> Option<&str> {
        match self {
            Fragment::Carousel { instance_id, .. } => Some(instance_id),
            Fragment::Empty(_) => None,
        }
    }
}

#[derive(Serialize)]
struct CarouselView<'a> {
    id: &'a str,
    root_class: &'static str,
    ride: &'static str,
    interval: String,
    keyboard: &'static str,
    touch: &'static str,
    pause: &'static str,
    wrap: &'static str,
    transition: &'static str,
    indicators: bool,
    controls: bool,
    style: Option<StyleView>,
    slides: Vec<SlideView<'a>>,
}

#[derive(Serialize)]
struct StyleView {
    height: Option<u32>,
    fit: &'static str,
    narrow_max_height: Option<String>,
}

#[derive(Serialize)]
struct SlideView<'a> {
    image_url: &'a str,
    alt: &'a str,
    caption: Option<CaptionView<'a>>,
    cta: Option<CtaView<'a>>,
}

#[derive(Serialize)]
struct CaptionView<'a> {
    title: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct CtaView<'a> {
    text: &'a str,
    url: &'a str,
    style: &'static str,
    new_tab: bool,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_trim_blocks(true);
        env.add_filter("url", |value: String| {
            Value::from_safe_string(escape::url(&value))
        });
        env.add_filter("nl2br", |value: String| {
            Value::from_safe_string(escape::nl2br(&value))
        });
        env.add_template("carousel.html", CAROUSEL_TEMPLATE)?;
        env.add_template("cta.html", CTA_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Renders `slider` with `slides`. `requested_id` is the slug the caller
    /// asked for, used in the diagnostic when the slider does not exist.
    ///
    /// Inactive slides are skipped and the rest are shown in `(order, id)`
    /// sequence, whatever order they are passed in.
    pub fn render(
        &self,
        ctx: &mut RenderContext,
        requested_id: &str,
        slider: Option<&Slider>,
        slides: &[Slide],
    ) -> Result<Fragment> {
        if requested_id.trim().is_empty() {
            return Ok(Fragment::Empty(EmptyReason::MissingId));
        }
        let Some(slider) = slider else {
            tracing::debug!(slider = requested_id, "render skipped: not found");
            return Ok(Fragment::Empty(EmptyReason::NotFound(requested_id.to_string())));
        };
        if !slider.settings.active {
            tracing::debug!(slider = %slider.id, "render skipped: inactive");
            return Ok(Fragment::Empty(EmptyReason::Inactive(slider.id.clone())));
        }

        let mut visible: Vec<Slide> = slides.iter().filter(|s| s.active).cloned().collect();
        if visible.is_empty() {
            tracing::warn!(slider = %slider.id, "render skipped: no active slides");
            return Ok(Fragment::Empty(EmptyReason::NoActiveSlides(slider.id.clone())));
        }
        sort_slides(&mut visible);

        let instance_id = ctx.next_instance_id(&slider.id);
        let html = self
            .env
            .get_template("carousel.html")?
            .render(carousel_view(&instance_id, slider, &visible))?;
        tracing::debug!(
            slider = %slider.id,
            instance = %instance_id,
            slides = visible.len(),
            "carousel rendered"
        );

        Ok(Fragment::Carousel { instance_id, html })
    }
}

fn carousel_view<'a>(id: &'a str, slider: &Slider, slides: &'a [Slide]) -> CarouselView<'a> {
    let settings = &slider.settings;
    let fade = settings.transition == Transition::Crossfade;

    CarouselView {
        id,
        root_class: if fade {
            "carousel slide carousel-fade"
        } else {
            "carousel slide"
        },
        ride: if settings.autoplay { "carousel" } else { "false" },
        interval: if settings.autoplay {
            settings.interval.to_string()
        } else {
            "false".to_string()
        },
        keyboard: data_flag(settings.keyboard),
        touch: data_flag(settings.touch),
        pause: if settings.pause_on_hover { "hover" } else { "false" },
        wrap: data_flag(settings.wrap),
        transition: settings.transition.as_str(),
        indicators: settings.indicators,
        controls: settings.controls,
        style: style_view(settings.image_height, settings.image_fit),
        slides: slides.iter().map(slide_view).collect(),
    }
}

/// Bootstrap only reads the exact strings `true` and `false` as booleans.
fn data_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn style_view(height: ImageHeight, fit: ImageFit) -> Option<StyleView> {
    if height == ImageHeight::Auto && fit == ImageFit::Cover {
        return None;
    }
    let px = height.pixels();
    Some(StyleView {
        height: px,
        fit: fit.as_str(),
        narrow_max_height: px.map(|px| format_px(NARROW_MAX_HEIGHT.min(f64::from(px) / 2.0))),
    })
}

fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{}", value)
    }
}

fn slide_view(slide: &Slide) -> SlideView<'_> {
    let cta = slide.cta.is_visible().then(|| CtaView {
        text: &slide.cta.text,
        url: &slide.cta.url,
        style: slide.cta.style.as_class(),
        new_tab: slide.cta.new_tab,
    });
    let show_caption = slide.caption.enabled && (slide.caption.has_content() || cta.is_some());

    SlideView {
        image_url: &slide.image.url,
        alt: &slide.image.alt,
        caption: show_caption.then(|| CaptionView {
            title: &slide.caption.title,
            text: &slide.caption.text,
        }),
        cta,
    }
}
