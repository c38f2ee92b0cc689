use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CarouselError, Result};
use crate::form::FormInput;
use crate::merge::merge_slider;
use crate::sanitize::{is_valid_slug, sanitize_slider, sanitize_slider_id};
use crate::store::DataStore;
use chrono::Utc;

pub fn run<S: DataStore>(store: &mut S, form: &FormInput) -> Result<CmdResult> {
    let patch = sanitize_slider(form)?;
    if store.slider_exists(&patch.id)? {
        return Err(CarouselError::SliderExists(patch.id));
    }

    let slider = merge_slider(None, &patch, Utc::now());
    store.save_slider(&slider)?;
    tracing::info!(slider = %slider.id, "slider created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Slider created: {} ({})",
        slider.name, slider.id
    )));
    Ok(result.with_affected_sliders(vec![slider]))
}

/// Whether `id` is a well-formed slug no slider uses yet.
pub fn is_id_available<S: DataStore>(store: &S, id: &str) -> Result<bool> {
    let id = sanitize_slider_id(id);
    if id.is_empty() || !is_valid_slug(&id) {
        return Ok(false);
    }
    Ok(!store.slider_exists(&id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transition;
    use crate::store::memory::InMemoryStore;

    fn form(id: &str) -> FormInput {
        FormInput::new().with("id", id).with("name", "Home page")
    }

    #[test]
    fn creates_slider_with_defaults() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, &form("home").with("transition", "crossfade")).unwrap();

        assert_eq!(result.affected_sliders.len(), 1);
        let stored = store.get_slider("home").unwrap();
        assert_eq!(stored.settings.transition, Transition::Crossfade);
        assert_eq!(stored.settings.interval, 5000);
        assert!(result.messages[0].content.contains("Slider created"));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = InMemoryStore::new();
        run(&mut store, &form("home")).unwrap();
        let err = run(&mut store, &form("home")).unwrap_err();
        assert!(matches!(err, CarouselError::SliderExists(id) if id == "home"));
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let mut store = InMemoryStore::new();
        let err = run(&mut store, &form("Home Page")).unwrap_err();
        assert!(matches!(err, CarouselError::Validation(_)));
        assert!(store.list_sliders().unwrap().is_empty());
    }

    #[test]
    fn availability_check() {
        let mut store = InMemoryStore::new();
        assert!(is_id_available(&store, "home").unwrap());
        run(&mut store, &form("home")).unwrap();
        assert!(!is_id_available(&store, "home").unwrap());
        assert!(!is_id_available(&store, "HOME").unwrap());
        assert!(!is_id_available(&store, "bad id").unwrap());
        assert!(!is_id_available(&store, "").unwrap());
    }
}
