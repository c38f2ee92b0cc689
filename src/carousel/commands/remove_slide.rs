use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CarouselError, Result};
use crate::model::SlideId;
use crate::store::DataStore;

/// Deletes one slide. The remaining order values are left as they are.
pub fn run<S: DataStore>(store: &mut S, slide_id: SlideId) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let slide = match store.get_slide(slide_id) {
        Ok(slide) => slide,
        Err(CarouselError::SlideNotFound(_)) => {
            result.add_message(CmdMessage::warning(format!(
                "Slide not found: {}",
                slide_id
            )));
            return Ok(result);
        }
        Err(e) => return Err(e),
    };

    store.delete_slide(slide_id)?;
    tracing::info!(slide = slide_id, slider = %slide.slider_id, "slide deleted");

    result.add_message(CmdMessage::success(format!(
        "Slide {} removed from {}",
        slide.id, slide.slider_id
    )));
    Ok(result.with_affected_slides(vec![slide]))
}
