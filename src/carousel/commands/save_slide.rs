use crate::assets::AssetResolver;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CarouselError, Result};
use crate::form::FormInput;
use crate::merge::{merge_slide, SlideBase};
use crate::model::SlideId;
use crate::ordering::next_order;
use crate::sanitize::{sanitize_slide, EntityKind};
use crate::store::DataStore;
use chrono::Utc;

/// Adds a slide to the end of its slider.
///
/// Nothing is written (not even an id allocation) unless the form is valid,
/// the slider exists and the image resolves.
pub fn create<S: DataStore, R: AssetResolver + ?Sized>(
    store: &mut S,
    resolver: &R,
    form: &FormInput,
) -> Result<CmdResult> {
    let patch = sanitize_slide(form, EntityKind::Slide)?;
    let slider_id = patch.slider_id.clone().unwrap_or_default();
    if !store.slider_exists(&slider_id)? {
        return Err(CarouselError::Integrity(format!(
            "Slider \"{}\" does not exist",
            slider_id
        )));
    }

    let order = next_order(store, &slider_id)?;
    // Dry merge so an unresolvable image fails before an id is consumed.
    merge_slide(SlideBase::New { id: 0, order }, &patch, resolver, Utc::now())?;

    let id = store.allocate_slide_id()?;
    let slide = merge_slide(SlideBase::New { id, order }, &patch, resolver, Utc::now())?;
    store.save_slide(&slide)?;
    tracing::info!(slide = slide.id, slider = %slide.slider_id, order, "slide created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Slide {} added to {} at position {}",
        slide.id,
        slide.slider_id,
        store.count_slides(&slide.slider_id, false)?
    )));
    Ok(result.with_affected_slides(vec![slide]))
}

/// Applies `form` to an existing slide. Absent fields keep their values.
pub fn update<S: DataStore, R: AssetResolver + ?Sized>(
    store: &mut S,
    resolver: &R,
    slide_id: SlideId,
    form: &FormInput,
) -> Result<CmdResult> {
    let patch = sanitize_slide(form, EntityKind::SlidePatch)?;
    let existing = store.get_slide(slide_id)?;
    let slide = merge_slide(SlideBase::Existing(&existing), &patch, resolver, Utc::now())?;
    store.save_slide(&slide)?;
    tracing::info!(slide = slide.id, slider = %slide.slider_id, "slide updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Slide {} updated", slide.id)));
    Ok(result.with_affected_slides(vec![slide]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn catalog() -> AssetCatalog {
        AssetCatalog::new()
            .with_asset(7, "https://cdn.test/7.jpg")
            .with_asset(8, "https://cdn.test/8.jpg")
    }

    fn store() -> InMemoryStore {
        StoreFixture::new().with_slider("home").store
    }

    fn slide_form() -> FormInput {
        FormInput::new().with("slider_id", "home").with("image_id", "7")
    }

    #[test]
    fn sequential_creates_get_contiguous_orders() {
        let mut store = store();
        for _ in 0..4 {
            create(&mut store, &catalog(), &slide_form()).unwrap();
        }
        let orders: Vec<u32> = store
            .list_slides("home", false)
            .unwrap()
            .iter()
            .map(|s| s.order)
            .collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn create_resolves_image_url() {
        let mut store = store();
        let result =
            create(&mut store, &catalog(), &slide_form().with("image_alt", "Hero")).unwrap();
        let slide = &result.affected_slides[0];
        assert_eq!(slide.image.url, "https://cdn.test/7.jpg");
        assert_eq!(slide.image.alt, "Hero");
        assert!(slide.active);
    }

    #[test]
    fn create_for_missing_slider_is_integrity_error() {
        let mut store = InMemoryStore::new();
        let err = create(&mut store, &catalog(), &slide_form()).unwrap_err();
        assert!(matches!(err, CarouselError::Integrity(_)));
    }

    #[test]
    fn unresolvable_image_consumes_no_id() {
        let mut store = store();
        let err = create(&mut store, &catalog(), &slide_form().with("image_id", "99")).unwrap_err();
        assert!(matches!(err, CarouselError::Validation(_)));
        assert_eq!(store.allocate_slide_id().unwrap(), 1);
    }

    #[test]
    fn invalid_button_url_fails_validation() {
        let mut store = store();
        let form = slide_form()
            .with("button_enabled", "1")
            .with("button_text", "Go")
            .with("button_url", "not a url");
        let err = create(&mut store, &catalog(), &form).unwrap_err();
        assert!(err.to_string().contains("Button URL is not valid."));
        assert!(store.list_all_slides().unwrap().is_empty());
    }

    #[test]
    fn update_keeps_absent_fields() {
        let mut store = store();
        let form = slide_form()
            .with("caption_enabled", "1")
            .with("caption_title", "Spring");
        create(&mut store, &catalog(), &form).unwrap();

        update(&mut store, &catalog(), 1, &FormInput::new().with("image_id", "8")).unwrap();
        let slide = store.get_slide(1).unwrap();
        assert_eq!(slide.image.url, "https://cdn.test/8.jpg");
        assert_eq!(slide.caption.title, "Spring");
        assert!(slide.caption.enabled);
    }

    #[test]
    fn update_unknown_slide_is_not_found() {
        let mut store = store();
        let err = update(&mut store, &catalog(), 5, &FormInput::new()).unwrap_err();
        assert!(matches!(err, CarouselError::SlideNotFound(5)));
    }
}
