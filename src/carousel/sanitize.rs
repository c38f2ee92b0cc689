//! # Validation & Sanitization
//!
//! The single gate every mutation passes through. A [`FormInput`] goes in,
//! a typed patch comes out, or a [`ValidationError`] listing everything that
//! was wrong with the request.
//!
//! Two phases, always in this order:
//!
//! 1. **Coercion**: every present field is forced into its declared type.
//!    Out-of-domain values fall back to a fixed value instead of failing
//!    (unknown transition becomes `slide`, unknown fit becomes `cover`,
//!    the interval is clamped into `[1000, 30000]`, unknown button styles
//!    become `btn-primary`).
//! 2. **Validation**: required fields and formats are checked on the coerced
//!    values. All problems are collected, then reported together.
//!
//! Absent fields stay `None` in the patch. Whether `None` means "use the
//! default" or "keep what is stored" is decided later by [`crate::merge`].
//!
//! Nothing here touches a store.

use crate::error::ValidationError;
use crate::form::FormInput;
use crate::model::{
    AssetId, ButtonStyle, ImageFit, ImageHeight, Transition, INTERVAL_MAX, INTERVAL_MIN,
};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static INLINE_SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\f\v]+").expect("valid regex"));

/// URL schemes a call-to-action may point at.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

pub const MSG_SLIDER_ID_REQUIRED: &str = "Slider ID is required.";
pub const MSG_SLIDER_NAME_REQUIRED: &str = "Slider name is required.";
pub const MSG_SLIDER_ID_FORMAT: &str =
    "Slider ID can only contain lowercase letters, numbers, and hyphens.";
pub const MSG_IMAGE_REQUIRED: &str = "Slide image is required.";
pub const MSG_BUTTON_URL_INVALID: &str = "Button URL is not valid.";

/// Which record shape a request is validated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A full slider form: id and name are required.
    Slider,
    /// A full slide form (creation): owning slider and image are required.
    Slide,
    /// A targeted slide update: nothing is required, present fields are checked.
    SlidePatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalRecord {
    Slider(SliderPatch),
    Slide(SlidePatch),
}

/// Coerced slider form. `id` and `name` have passed the required checks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SliderPatch {
    pub id: String,
    pub name: String,
    pub active: Option<bool>,
    pub indicators: Option<bool>,
    pub controls: Option<bool>,
    pub autoplay: Option<bool>,
    pub interval: Option<u32>,
    pub keyboard: Option<bool>,
    pub touch: Option<bool>,
    pub pause_on_hover: Option<bool>,
    pub wrap: Option<bool>,
    pub transition: Option<Transition>,
    pub image_height: Option<ImageHeight>,
    pub image_fit: Option<ImageFit>,
}

/// Coerced slide form. Every field is optional; see [`EntityKind`] for which
/// ones a given request kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlidePatch {
    pub slider_id: Option<String>,
    pub order: Option<u32>,
    pub asset_id: Option<AssetId>,
    pub image_alt: Option<String>,
    pub caption_enabled: Option<bool>,
    pub caption_title: Option<String>,
    pub caption_text: Option<String>,
    pub button_enabled: Option<bool>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub button_style: Option<ButtonStyle>,
    pub button_new_tab: Option<bool>,
    pub active: Option<bool>,
}

impl SlidePatch {
    /// A patch that only flips the active flag.
    pub fn active_only(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Default::default()
        }
    }
}

pub fn sanitize_and_validate(
    input: &FormInput,
    kind: EntityKind,
) -> Result<CanonicalRecord, ValidationError> {
    match kind {
        EntityKind::Slider => sanitize_slider(input).map(CanonicalRecord::Slider),
        EntityKind::Slide | EntityKind::SlidePatch => {
            sanitize_slide(input, kind).map(CanonicalRecord::Slide)
        }
    }
}

pub fn sanitize_slider(input: &FormInput) -> Result<SliderPatch, ValidationError> {
    let patch = SliderPatch {
        id: input.get("id").map(sanitize_slider_id).unwrap_or_default(),
        name: input.get("name").map(clean_line).unwrap_or_default(),
        active: input.get("active").map(parse_flag),
        indicators: input.get("indicators").map(parse_flag),
        controls: input.get("controls").map(parse_flag),
        autoplay: input.get("autoplay").map(parse_flag),
        interval: input.get("interval").map(clamp_interval),
        keyboard: input.get("keyboard").map(parse_flag),
        touch: input.get("touch").map(parse_flag),
        pause_on_hover: input
            .get("pause_hover")
            .or_else(|| input.get("pause_on_hover"))
            .map(parse_flag),
        wrap: input.get("wrap").map(parse_flag),
        transition: input
            .get("transition")
            .map(|v| Transition::parse(v.trim()).unwrap_or_default()),
        image_height: input
            .get("image_height")
            .map(|v| v.trim().parse().unwrap_or_default()),
        image_fit: input
            .get("image_fit")
            .map(|v| ImageFit::parse(v.trim()).unwrap_or_default()),
    };

    let mut errors = Vec::new();
    if patch.id.is_empty() {
        errors.push(MSG_SLIDER_ID_REQUIRED.to_string());
    }
    if patch.name.is_empty() {
        errors.push(MSG_SLIDER_NAME_REQUIRED.to_string());
    }
    if !patch.id.is_empty() && !is_valid_slug(&patch.id) {
        errors.push(MSG_SLIDER_ID_FORMAT.to_string());
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError::from_messages(errors))
    }
}

pub fn sanitize_slide(input: &FormInput, kind: EntityKind) -> Result<SlidePatch, ValidationError> {
    let patch = SlidePatch {
        slider_id: input.get("slider_id").map(sanitize_slider_id),
        order: input.get("slide_order").map(|v| saturating_u32(absint(v))),
        asset_id: input.get("image_id").map(absint),
        image_alt: input.get("image_alt").map(clean_line),
        caption_enabled: input.get("caption_enabled").map(parse_flag),
        caption_title: input.get("caption_title").map(clean_line),
        caption_text: input.get("caption_text").map(clean_multiline),
        button_enabled: input.get("button_enabled").map(parse_flag),
        button_text: input.get("button_text").map(clean_line),
        button_url: input.get("button_url").map(clean_url),
        button_style: input
            .get("button_style")
            .map(|v| ButtonStyle::parse(v.trim()).unwrap_or_default()),
        button_new_tab: input.get("button_new_tab").map(parse_flag),
        active: input.get("active").map(parse_flag),
    };

    let mut errors = Vec::new();
    let full_form = kind != EntityKind::SlidePatch;

    match patch.slider_id.as_deref() {
        None | Some("") if full_form => errors.push(MSG_SLIDER_ID_REQUIRED.to_string()),
        Some("") => errors.push(MSG_SLIDER_ID_REQUIRED.to_string()),
        Some(id) if !is_valid_slug(id) => errors.push(MSG_SLIDER_ID_FORMAT.to_string()),
        _ => {}
    }

    match patch.asset_id {
        None if full_form => errors.push(MSG_IMAGE_REQUIRED.to_string()),
        Some(0) => errors.push(MSG_IMAGE_REQUIRED.to_string()),
        _ => {}
    }

    // A patch that leaves the flag alone may be touching an enabled button.
    let cta_may_be_enabled = if full_form {
        patch.button_enabled == Some(true)
    } else {
        patch.button_enabled != Some(false)
    };
    if cta_may_be_enabled {
        if let Some(url) = patch.button_url.as_deref() {
            if !url.is_empty() && !is_valid_cta_url(url) {
                errors.push(MSG_BUTTON_URL_INVALID.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError::from_messages(errors))
    }
}

/// Normalizes an identifier coming from a form field or a URL path segment.
pub fn sanitize_slider_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_slug(id: &str) -> bool {
    SLUG_RE.is_match(id)
}

/// Well-formed absolute URL with an allowed scheme.
pub fn is_valid_cta_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            let scheme = url.scheme();
            ALLOWED_SCHEMES.contains(&scheme)
                && (!matches!(scheme, "http" | "https") || url.host().is_some())
        }
        Err(_) => false,
    }
}

/// Form truthiness: empty, `0`, `false`, `off` and `no` are false, anything else is true.
pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    !matches!(value.as_str(), "" | "0" | "false" | "off" | "no")
}

/// Absolute value of the leading integer in `raw`, `0` when there is none.
pub fn absint(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Interval in milliseconds, clamped to the nearest bound. Negative input is
/// below the range, so it lands on the minimum.
pub fn clamp_interval(raw: &str) -> u32 {
    if raw.trim().starts_with('-') {
        return INTERVAL_MIN;
    }
    let value = absint(raw).clamp(INTERVAL_MIN as u64, INTERVAL_MAX as u64);
    value as u32
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Single-line text: control characters dropped, whitespace runs collapsed.
pub fn clean_line(raw: &str) -> String {
    let without_controls: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE_RUN
        .replace_all(&without_controls, " ")
        .trim()
        .to_string()
}

/// Multi-line text: like [`clean_line`] per line, line breaks preserved.
pub fn clean_multiline(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized
        .split('\n')
        .map(|line| {
            let without_controls: String = line
                .chars()
                .map(|c| if c.is_control() && c != '\t' { ' ' } else { c })
                .collect();
            INLINE_SPACE_RUN
                .replace_all(&without_controls, " ")
                .trim()
                .to_string()
        })
        .collect();
    lines.join("\n").trim().to_string()
}

/// Strips whitespace and control characters a URL can never legitimately contain.
pub fn clean_url(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider_form() -> FormInput {
        FormInput::new().with("id", "home").with("name", "Home page")
    }

    fn slide_form() -> FormInput {
        FormInput::new().with("slider_id", "home").with("image_id", "7")
    }

    #[test]
    fn interval_is_clamped_into_bounds() {
        for (raw, expected) in [
            ("500", 1000),
            ("99999", 30000),
            ("5000", 5000),
            ("1000", 1000),
            ("30000", 30000),
        ] {
            let patch = sanitize_slider(&slider_form().with("interval", raw)).unwrap();
            assert_eq!(patch.interval, Some(expected), "input {}", raw);
        }
    }

    #[test]
    fn garbage_interval_clamps_to_minimum() {
        let patch = sanitize_slider(&slider_form().with("interval", "soon")).unwrap();
        assert_eq!(patch.interval, Some(1000));
    }

    #[test]
    fn negative_interval_clamps_to_minimum() {
        for raw in ["-2500", "-99999", " -1"] {
            let patch = sanitize_slider(&slider_form().with("interval", raw)).unwrap();
            assert_eq!(patch.interval, Some(1000), "input {:?}", raw);
        }
        assert_eq!(clamp_interval("+4000"), 4000);
    }

    #[test]
    fn unknown_enums_fall_back() {
        let form = slider_form()
            .with("transition", "zoom")
            .with("image_fit", "stretch")
            .with("image_height", "tall");
        let patch = sanitize_slider(&form).unwrap();
        assert_eq!(patch.transition, Some(Transition::Slide));
        assert_eq!(patch.image_fit, Some(ImageFit::Cover));
        assert_eq!(patch.image_height, Some(ImageHeight::Auto));
    }

    #[test]
    fn known_enums_are_kept() {
        let form = slider_form()
            .with("transition", "crossfade")
            .with("image_fit", "contain")
            .with("image_height", "420");
        let patch = sanitize_slider(&form).unwrap();
        assert_eq!(patch.transition, Some(Transition::Crossfade));
        assert_eq!(patch.image_fit, Some(ImageFit::Contain));
        assert_eq!(patch.image_height, Some(ImageHeight::Pixels(420)));
    }

    #[test]
    fn absent_slider_fields_stay_unset() {
        let patch = sanitize_slider(&slider_form()).unwrap();
        assert_eq!(patch.autoplay, None);
        assert_eq!(patch.interval, None);
        assert_eq!(patch.transition, None);
    }

    #[test]
    fn slider_requires_id_and_name() {
        let err = sanitize_slider(&FormInput::new()).unwrap_err();
        assert_eq!(
            err.messages,
            vec![MSG_SLIDER_ID_REQUIRED.to_string(), MSG_SLIDER_NAME_REQUIRED.to_string()]
        );
        assert_eq!(err.to_string(), "Slider ID is required. Slider name is required.");
    }

    #[test]
    fn slider_id_is_lowercased_then_checked() {
        let patch =
            sanitize_slider(&FormInput::new().with("id", " Home-2 ").with("name", "x")).unwrap();
        assert_eq!(patch.id, "home-2");

        let err = sanitize_slider(&FormInput::new().with("id", "home page").with("name", "x"))
            .unwrap_err();
        assert_eq!(err.messages, vec![MSG_SLIDER_ID_FORMAT.to_string()]);
    }

    #[test]
    fn name_whitespace_is_collapsed() {
        let form = FormInput::new().with("id", "a").with("name", "  Big \n  Sale ");
        let patch = sanitize_slider(&form).unwrap();
        assert_eq!(patch.name, "Big Sale");

        let err =
            sanitize_slider(&FormInput::new().with("id", "a").with("name", "   ")).unwrap_err();
        assert_eq!(err.messages, vec![MSG_SLIDER_NAME_REQUIRED.to_string()]);
    }

    #[test]
    fn flags_follow_form_truthiness() {
        for (raw, expected) in [
            ("1", true),
            ("on", true),
            ("yes", true),
            ("0", false),
            ("", false),
            ("off", false),
            ("FALSE", false),
        ] {
            assert_eq!(parse_flag(raw), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn slide_requires_slider_and_image() {
        let err = sanitize_slide(&FormInput::new(), EntityKind::Slide).unwrap_err();
        assert_eq!(
            err.messages,
            vec![MSG_SLIDER_ID_REQUIRED.to_string(), MSG_IMAGE_REQUIRED.to_string()]
        );

        let err =
            sanitize_slide(&slide_form().with("image_id", "0"), EntityKind::Slide).unwrap_err();
        assert_eq!(err.messages, vec![MSG_IMAGE_REQUIRED.to_string()]);
    }

    #[test]
    fn patch_requires_nothing() {
        let patch =
            sanitize_slide(&FormInput::new().with("active", "0"), EntityKind::SlidePatch).unwrap();
        assert_eq!(patch, SlidePatch::active_only(false));
    }

    #[test]
    fn enabled_button_with_malformed_url_fails() {
        let form = slide_form()
            .with("button_enabled", "1")
            .with("button_text", "Go")
            .with("button_url", "not a url");
        let err = sanitize_slide(&form, EntityKind::Slide).unwrap_err();
        assert_eq!(err.messages, vec![MSG_BUTTON_URL_INVALID.to_string()]);
    }

    #[test]
    fn disabled_button_url_is_not_checked() {
        let form = slide_form()
            .with("button_enabled", "0")
            .with("button_url", "not a url");
        assert!(sanitize_slide(&form, EntityKind::Slide).is_ok());
    }

    #[test]
    fn patch_checks_url_unless_button_is_being_disabled() {
        let form = FormInput::new().with("button_url", "javascript:alert(1)");
        assert!(sanitize_slide(&form, EntityKind::SlidePatch).is_err());
        let form = form.with("button_enabled", "0");
        assert!(sanitize_slide(&form, EntityKind::SlidePatch).is_ok());
    }

    #[test]
    fn unknown_button_style_becomes_primary() {
        let form = slide_form().with("button_style", "btn-outline");
        let patch = sanitize_slide(&form, EntityKind::Slide).unwrap();
        assert_eq!(patch.button_style, Some(ButtonStyle::Primary));
        let form = slide_form().with("button_style", "btn-dark");
        let patch = sanitize_slide(&form, EntityKind::Slide).unwrap();
        assert_eq!(patch.button_style, Some(ButtonStyle::Dark));
    }

    #[test]
    fn caption_text_keeps_line_breaks() {
        let patch = sanitize_slide(
            &slide_form().with("caption_text", "  First   line\r\nSecond\tline  "),
            EntityKind::Slide,
        )
        .unwrap();
        assert_eq!(patch.caption_text.as_deref(), Some("First line\nSecond line"));
    }

    #[test]
    fn cta_url_rules() {
        assert!(is_valid_cta_url("https://example.com/offer?x=1"));
        assert!(is_valid_cta_url("mailto:sales@example.com"));
        assert!(!is_valid_cta_url("/relative/path"));
        assert!(!is_valid_cta_url("javascript:alert(1)"));
        assert!(!is_valid_cta_url("http://"));
    }

    #[test]
    fn dispatches_on_entity_kind() {
        let record = sanitize_and_validate(&slider_form(), EntityKind::Slider).unwrap();
        assert!(matches!(record, CanonicalRecord::Slider(_)));
        let record = sanitize_and_validate(&slide_form(), EntityKind::Slide).unwrap();
        assert!(matches!(record, CanonicalRecord::Slide(_)));
    }
}
