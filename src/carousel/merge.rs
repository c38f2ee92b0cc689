//! # Configuration Merge
//!
//! Turns a validated patch plus the currently stored record (if any) into the
//! record that gets persisted.
//!
//! - Fields absent from the patch keep their stored value on update, or take
//!   the defaults table on create ([`SliderSettings::default`], and the slide
//!   defaults in [`new_slide_defaults`]).
//! - Creation timestamps and identifiers never change; `modified_at` is
//!   always `now`.
//! - A slide's image URL is re-resolved from its asset id whenever the id is
//!   supplied.
//!
//! Merging the same patch twice with the same `now` yields the same record.

use crate::assets::AssetResolver;
use crate::error::{CarouselError, Result, ValidationError};
use crate::model::{
    CallToAction, Caption, ImageRef, Slide, SlideId, Slider, SliderSettings,
};
use crate::sanitize::{
    is_valid_cta_url, SlidePatch, SliderPatch, MSG_BUTTON_URL_INVALID, MSG_IMAGE_REQUIRED,
    MSG_SLIDER_ID_REQUIRED,
};
use chrono::{DateTime, Utc};

pub const MSG_IMAGE_UNRESOLVED: &str = "Slide image could not be found.";

pub fn merge_slider(existing: Option<&Slider>, patch: &SliderPatch, now: DateTime<Utc>) -> Slider {
    let mut settings = existing
        .map(|slider| slider.settings.clone())
        .unwrap_or_default();
    apply_settings(&mut settings, patch);

    match existing {
        Some(slider) => Slider {
            id: slider.id.clone(),
            name: patch.name.clone(),
            settings,
            created_at: slider.created_at,
            modified_at: now,
        },
        None => Slider {
            id: patch.id.clone(),
            name: patch.name.clone(),
            settings,
            created_at: now,
            modified_at: now,
        },
    }
}

fn apply_settings(settings: &mut SliderSettings, patch: &SliderPatch) {
    fn set<T: Copy>(target: &mut T, value: Option<T>) {
        if let Some(value) = value {
            *target = value;
        }
    }

    set(&mut settings.active, patch.active);
    set(&mut settings.indicators, patch.indicators);
    set(&mut settings.controls, patch.controls);
    set(&mut settings.autoplay, patch.autoplay);
    set(&mut settings.interval, patch.interval);
    set(&mut settings.keyboard, patch.keyboard);
    set(&mut settings.touch, patch.touch);
    set(&mut settings.pause_on_hover, patch.pause_on_hover);
    set(&mut settings.wrap, patch.wrap);
    set(&mut settings.transition, patch.transition);
    set(&mut settings.image_height, patch.image_height);
    set(&mut settings.image_fit, patch.image_fit);
}

/// What a slide patch is applied to.
#[derive(Debug, Clone, Copy)]
pub enum SlideBase<'a> {
    /// A slide being created, with its freshly allocated id and order.
    New { id: SlideId, order: u32 },
    Existing(&'a Slide),
}

/// Field values of a slide nobody has filled in yet.
pub fn new_slide_defaults(id: SlideId, slider_id: &str, order: u32, now: DateTime<Utc>) -> Slide {
    Slide {
        id,
        slider_id: slider_id.to_string(),
        order,
        image: ImageRef::default(),
        caption: Caption::default(),
        cta: CallToAction::default(),
        active: true,
        created_at: now,
        modified_at: now,
    }
}

pub fn merge_slide<R: AssetResolver + ?Sized>(
    base: SlideBase<'_>,
    patch: &SlidePatch,
    resolver: &R,
    now: DateTime<Utc>,
) -> Result<Slide> {
    let mut slide = match base {
        SlideBase::New { id, order } => {
            let slider_id = patch
                .slider_id
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ValidationError::new(MSG_SLIDER_ID_REQUIRED))?;
            if patch.asset_id.is_none() {
                return Err(ValidationError::new(MSG_IMAGE_REQUIRED).into());
            }
            new_slide_defaults(id, slider_id, order, now)
        }
        SlideBase::Existing(existing) => {
            if let Some(target) = patch.slider_id.as_deref() {
                if target != existing.slider_id {
                    return Err(CarouselError::Integrity(format!(
                        "Slide {} belongs to slider \"{}\" and cannot be moved to \"{}\"",
                        existing.id, existing.slider_id, target
                    )));
                }
            }
            let mut slide = existing.clone();
            if let Some(order) = patch.order {
                slide.order = order;
            }
            slide.modified_at = now;
            slide
        }
    };

    if let Some(asset_id) = patch.asset_id {
        let url = resolver.resolve(asset_id).ok_or_else(|| {
            tracing::warn!(asset_id, "slide references an unknown asset");
            ValidationError::new(MSG_IMAGE_UNRESOLVED)
        })?;
        slide.image.asset_id = asset_id;
        slide.image.url = url;
    }
    if let Some(alt) = &patch.image_alt {
        slide.image.alt = alt.clone();
    }

    if let Some(enabled) = patch.caption_enabled {
        slide.caption.enabled = enabled;
    }
    if let Some(title) = &patch.caption_title {
        slide.caption.title = title.clone();
    }
    if let Some(text) = &patch.caption_text {
        slide.caption.text = text.clone();
    }

    if let Some(enabled) = patch.button_enabled {
        slide.cta.enabled = enabled;
    }
    if let Some(text) = &patch.button_text {
        slide.cta.text = text.clone();
    }
    if let Some(url) = &patch.button_url {
        slide.cta.url = url.clone();
    }
    if let Some(style) = patch.button_style {
        slide.cta.style = style;
    }
    if let Some(new_tab) = patch.button_new_tab {
        slide.cta.new_tab = new_tab;
    }
    if let Some(active) = patch.active {
        slide.active = active;
    }

    // Enabling a button whose stored URL was never checked.
    if slide.cta.enabled && !slide.cta.url.is_empty() && !is_valid_cta_url(&slide.cta.url) {
        return Err(ValidationError::new(MSG_BUTTON_URL_INVALID).into());
    }

    Ok(slide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::model::{ButtonStyle, ImageHeight, Transition};

    fn now() -> DateTime<Utc> {
        "2026-03-01T10:00:00Z".parse().unwrap()
    }

    fn later() -> DateTime<Utc> {
        "2026-03-02T10:00:00Z".parse().unwrap()
    }

    fn catalog() -> AssetCatalog {
        AssetCatalog::new()
            .with_asset(7, "https://cdn.test/7.jpg")
            .with_asset(8, "https://cdn.test/8.jpg")
    }

    fn slider_patch() -> SliderPatch {
        SliderPatch {
            id: "home".into(),
            name: "Home".into(),
            ..Default::default()
        }
    }

    #[test]
    fn new_slider_takes_defaults_for_absent_fields() {
        let patch = SliderPatch {
            autoplay: Some(false),
            ..slider_patch()
        };
        let slider = merge_slider(None, &patch, now());
        assert!(!slider.settings.autoplay);
        assert_eq!(slider.settings.interval, 5000);
        assert!(slider.settings.indicators);
        assert_eq!(slider.created_at, now());
    }

    #[test]
    fn update_keeps_stored_values_for_absent_fields() {
        let created = merge_slider(
            None,
            &SliderPatch {
                interval: Some(8000),
                transition: Some(Transition::Crossfade),
                ..slider_patch()
            },
            now(),
        );
        let updated = merge_slider(
            Some(&created),
            &SliderPatch {
                name: "Renamed".into(),
                image_height: Some(ImageHeight::Pixels(300)),
                ..slider_patch()
            },
            later(),
        );
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.settings.interval, 8000);
        assert_eq!(updated.settings.transition, Transition::Crossfade);
        assert_eq!(updated.settings.image_height, ImageHeight::Pixels(300));
        assert_eq!(updated.created_at, now());
        assert_eq!(updated.modified_at, later());
    }

    #[test]
    fn slider_id_never_changes_on_update() {
        let created = merge_slider(None, &slider_patch(), now());
        let updated = merge_slider(
            Some(&created),
            &SliderPatch {
                id: "other".into(),
                ..slider_patch()
            },
            later(),
        );
        assert_eq!(updated.id, "home");
    }

    #[test]
    fn slider_merge_is_idempotent() {
        let patch = SliderPatch {
            wrap: Some(false),
            interval: Some(2000),
            ..slider_patch()
        };
        let once = merge_slider(None, &patch, now());
        let twice = merge_slider(Some(&once), &patch, now());
        assert_eq!(once, twice);
    }

    fn slide_patch() -> SlidePatch {
        SlidePatch {
            slider_id: Some("home".into()),
            asset_id: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn new_slide_resolves_image_and_applies_defaults() {
        let base = SlideBase::New { id: 1, order: 0 };
        let slide = merge_slide(base, &slide_patch(), &catalog(), now()).unwrap();
        assert_eq!(slide.image.url, "https://cdn.test/7.jpg");
        assert!(slide.active);
        assert!(!slide.caption.enabled);
        assert!(!slide.cta.enabled);
        assert_eq!(slide.cta.style, ButtonStyle::Primary);
    }

    #[test]
    fn new_slide_ignores_requested_order() {
        let patch = SlidePatch {
            order: Some(42),
            ..slide_patch()
        };
        let slide =
            merge_slide(SlideBase::New { id: 1, order: 3 }, &patch, &catalog(), now()).unwrap();
        assert_eq!(slide.order, 3);
    }

    #[test]
    fn unknown_asset_is_a_validation_error() {
        let patch = SlidePatch {
            asset_id: Some(99),
            ..slide_patch()
        };
        let err = merge_slide(SlideBase::New { id: 1, order: 0 }, &patch, &catalog(), now())
            .unwrap_err();
        assert!(matches!(err, CarouselError::Validation(_)));
    }

    #[test]
    fn changing_asset_rederives_url() {
        let base = SlideBase::New { id: 1, order: 0 };
        let slide = merge_slide(base, &slide_patch(), &catalog(), now()).unwrap();
        let patch = SlidePatch {
            asset_id: Some(8),
            ..Default::default()
        };
        let edited = merge_slide(SlideBase::Existing(&slide), &patch, &catalog(), later()).unwrap();
        assert_eq!(edited.image.url, "https://cdn.test/8.jpg");
        assert_eq!(edited.created_at, now());
        assert_eq!(edited.modified_at, later());
    }

    #[test]
    fn slide_cannot_move_between_sliders() {
        let base = SlideBase::New { id: 1, order: 0 };
        let slide = merge_slide(base, &slide_patch(), &catalog(), now()).unwrap();
        let patch = SlidePatch {
            slider_id: Some("promo".into()),
            ..Default::default()
        };
        let err =
            merge_slide(SlideBase::Existing(&slide), &patch, &catalog(), later()).unwrap_err();
        assert!(matches!(err, CarouselError::Integrity(_)));
    }

    #[test]
    fn enabling_button_revalidates_stored_url() {
        let patch = SlidePatch {
            button_url: Some("notaurl".into()),
            button_enabled: Some(false),
            ..slide_patch()
        };
        let slide =
            merge_slide(SlideBase::New { id: 1, order: 0 }, &patch, &catalog(), now()).unwrap();
        let enable = SlidePatch {
            button_enabled: Some(true),
            ..Default::default()
        };
        let err =
            merge_slide(SlideBase::Existing(&slide), &enable, &catalog(), later()).unwrap_err();
        assert!(matches!(err, CarouselError::Validation(_)));
    }

    #[test]
    fn slide_merge_is_idempotent() {
        let patch = SlidePatch {
            caption_enabled: Some(true),
            caption_title: Some("Spring".into()),
            ..slide_patch()
        };
        let once =
            merge_slide(SlideBase::New { id: 4, order: 1 }, &patch, &catalog(), now()).unwrap();
        let twice = merge_slide(SlideBase::Existing(&once), &patch, &catalog(), now()).unwrap();
        assert_eq!(once, twice);
    }
}
