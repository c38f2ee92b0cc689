use crate::commands::{slide_rows, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SlideId;
use crate::ordering;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &mut S, slider_id: &str, ids: &[SlideId]) -> Result<CmdResult> {
    let reordered = ordering::reorder(store, slider_id, ids)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Reordered {} slide(s) in {}",
        reordered.len(),
        slider_id
    )));
    Ok(result.with_listed_slides(slide_rows(reordered)))
}
