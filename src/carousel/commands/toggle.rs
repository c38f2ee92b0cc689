use crate::assets::AssetResolver;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::merge::{merge_slide, SlideBase};
use crate::model::SlideId;
use crate::sanitize::SlidePatch;
use crate::store::DataStore;
use chrono::Utc;

/// Sets a slide's active flag, or flips it when `active` is `None`.
/// Only the flag and the modification time change.
pub fn run<S: DataStore, R: AssetResolver + ?Sized>(
    store: &mut S,
    resolver: &R,
    slide_id: SlideId,
    active: Option<bool>,
) -> Result<CmdResult> {
    let existing = store.get_slide(slide_id)?;
    let target = active.unwrap_or(!existing.active);

    let slide = merge_slide(
        SlideBase::Existing(&existing),
        &SlidePatch::active_only(target),
        resolver,
        Utc::now(),
    )?;
    store.save_slide(&slide)?;
    tracing::info!(slide = slide_id, active = target, "slide toggled");

    let mut result = CmdResult::default();
    let state = if target { "enabled" } else { "disabled" };
    result.add_message(CmdMessage::success(format!("Slide {} {}", slide_id, state)));
    Ok(result.with_affected_slides(vec![slide]))
}
