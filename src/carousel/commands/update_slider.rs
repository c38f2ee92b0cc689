use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::form::FormInput;
use crate::merge::merge_slider;
use crate::sanitize::sanitize_slider;
use crate::store::DataStore;
use chrono::Utc;

/// Applies `form` to an existing slider. Fields the form leaves out keep their
/// stored values; the id is taken from `slider_id`, never from the form.
pub fn run<S: DataStore>(store: &mut S, slider_id: &str, form: &FormInput) -> Result<CmdResult> {
    let existing = store.get_slider(slider_id)?;

    let mut form = form.clone();
    form.insert("id", existing.id.as_str());
    if !form.contains("name") {
        form.insert("name", existing.name.as_str());
    }
    let patch = sanitize_slider(&form)?;

    let slider = merge_slider(Some(&existing), &patch, Utc::now());
    store.save_slider(&slider)?;
    tracing::info!(slider = %slider.id, "slider updated");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Slider updated: {}", slider.name)));
    Ok(result.with_affected_sliders(vec![slider]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CarouselError;
    use crate::model::ImageHeight;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn partial_update_keeps_other_settings() {
        let mut store = StoreFixture::new().with_slider("home").store;
        let before = store.get_slider("home").unwrap();

        run(
            &mut store,
            "home",
            &FormInput::new().with("autoplay", "0").with("image_height", "400"),
        )
        .unwrap();

        let after = store.get_slider("home").unwrap();
        assert!(!after.settings.autoplay);
        assert_eq!(after.settings.image_height, ImageHeight::Pixels(400));
        assert_eq!(after.settings.indicators, before.settings.indicators);
        assert_eq!(after.name, before.name);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn id_in_form_is_ignored() {
        let mut store = StoreFixture::new().with_slider("home").store;
        run(&mut store, "home", &FormInput::new().with("id", "other")).unwrap();
        assert!(store.slider_exists("home").unwrap());
        assert!(!store.slider_exists("other").unwrap());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut store = StoreFixture::new().with_slider("home").store;
        let err = run(&mut store, "home", &FormInput::new().with("name", " ")).unwrap_err();
        assert!(matches!(err, CarouselError::Validation(_)));
    }

    #[test]
    fn unknown_slider_is_not_found() {
        let mut store = InMemoryStore::new();
        let err = run(&mut store, "ghost", &FormInput::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
