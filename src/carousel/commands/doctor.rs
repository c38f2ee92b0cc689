use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::ordering;
use crate::store::DataStore;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub removed_orphan_slides: usize,
    pub reindexed_sliders: usize,
    pub renumbered_slides: usize,
}

impl DoctorReport {
    /// Lost index entries or orphaned slides. Order gaps left by ordinary
    /// deletes do not count.
    pub fn found_inconsistencies(&self) -> bool {
        self.reindexed_sliders > 0 || self.removed_orphan_slides > 0
    }
}

/// Repairs what a crashed or concurrent writer can leave behind.
pub fn repair<S: DataStore>(store: &mut S) -> Result<DoctorReport> {
    let mut report = DoctorReport::default();

    // Index first, so orphan detection sees every stored config.
    report.reindexed_sliders = store.reindex()?.len();

    let sliders = store.list_sliders()?;
    let known: HashSet<&str> = sliders.iter().map(|s| s.id.as_str()).collect();
    for slide in store.list_all_slides()? {
        if !known.contains(slide.slider_id.as_str()) {
            tracing::info!(slide = slide.id, slider = %slide.slider_id, "removing orphan slide");
            store.delete_slide(slide.id)?;
            report.removed_orphan_slides += 1;
        }
    }

    for slider in &sliders {
        report.renumbered_slides += ordering::renormalize(store, &slider.id)?;
    }

    Ok(report)
}

pub fn run<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let report = repair(store)?;
    let mut result = CmdResult::default();

    if report.found_inconsistencies() {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.reindexed_sliders > 0 {
            result.add_message(CmdMessage::success(format!(
                "  - Re-registered {} slider(s) missing from the index.",
                report.reindexed_sliders
            )));
        }
        if report.removed_orphan_slides > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} slide(s) whose slider no longer exists.",
                report.removed_orphan_slides
            )));
        }
    } else {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    }

    if report.renumbered_slides > 0 {
        result.add_message(CmdMessage::info(format!(
            "Compacted slide order: renumbered {} slide(s).",
            report.renumbered_slides
        )));
    }
    Ok(result)
}
