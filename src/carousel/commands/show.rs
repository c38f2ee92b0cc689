use crate::commands::{list, slide_rows, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

/// One slider with all of its slides, active or not, in display sequence.
pub fn run<S: DataStore>(store: &S, slider_id: &str, embed_tag: &str) -> Result<CmdResult> {
    let slider = store.get_slider(slider_id)?;
    let slides = store.list_slides(&slider.id, false)?;
    let summary = list::summarize(store, slider, embed_tag)?;

    let mut result = CmdResult::default();
    if slides.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No slides yet. Add one with: carousel add-slide {} image_id=<asset>",
            slider_id
        )));
    }
    Ok(result
        .with_listed_sliders(vec![summary])
        .with_listed_slides(slide_rows(slides)))
}
