use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CarouselError, Result};
use crate::store::DataStore;

/// Deletes a slider and all of its slides. Deleting an unknown slider is a
/// no-op reported as a warning.
pub fn run<S: DataStore>(store: &mut S, slider_id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let slider = match store.get_slider(slider_id) {
        Ok(slider) => slider,
        Err(CarouselError::SliderNotFound(_)) => {
            result.add_message(CmdMessage::warning(format!(
                "Slider not found: {}",
                slider_id
            )));
            return Ok(result);
        }
        Err(e) => return Err(e),
    };

    let removed = store.delete_slider(slider_id)?;
    tracing::info!(slider = slider_id, slides = removed, "slider deleted");

    result.add_message(CmdMessage::success(format!(
        "Slider deleted: {} ({} slide(s) removed)",
        slider.name, removed
    )));
    Ok(result.with_affected_sliders(vec![slider]))
}
