//! # Ordering Engine
//!
//! Slides carry a non-negative `order` value. New slides go after the current
//! maximum; deletes leave gaps; an explicit reorder rewrites the values to the
//! positions of the submitted list.
//!
//! Stored values are never assumed to be contiguous or unique. Whatever they
//! are, the display sequence is `(order, id)` ascending, and [`rank`] derives
//! the contiguous 0-based positions the sequence is shown in.
//!
//! A reorder is applied as one write per slide whose value changes. A failure
//! part way through leaves a mix of old and new values; the sequence is still
//! well defined through the id tie-breaker, and `doctor` renormalizes it.

use crate::error::{CarouselError, Result};
use crate::model::{Slide, SlideId};
use crate::store::{sort_slides, DataStore};
use serde::Serialize;
use std::collections::HashSet;

/// A slide together with its 0-based position in the display sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSlide {
    pub rank: usize,
    pub slide: Slide,
}

/// `max(order) + 1`, or `0` for a slider without slides.
pub fn next_order<S: DataStore + ?Sized>(store: &S, slider_id: &str) -> Result<u32> {
    Ok(store
        .max_order(slider_id)?
        .map_or(0, |max| max.saturating_add(1)))
}

pub fn rank(mut slides: Vec<Slide>) -> Vec<RankedSlide> {
    sort_slides(&mut slides);
    slides
        .into_iter()
        .enumerate()
        .map(|(rank, slide)| RankedSlide { rank, slide })
        .collect()
}

/// Sets each listed slide's order to its position in `ids`.
///
/// `ids` must name every slide of the slider exactly once; anything else is
/// rejected before a single write happens. Returns the slides in their new
/// sequence.
pub fn reorder<S: DataStore + ?Sized>(
    store: &mut S,
    slider_id: &str,
    ids: &[SlideId],
) -> Result<Vec<Slide>> {
    if !store.slider_exists(slider_id)? {
        return Err(CarouselError::SliderNotFound(slider_id.to_string()));
    }
    let slides = store.list_slides(slider_id, false)?;
    check_membership(slider_id, &slides, ids)?;

    let mut changed = 0;
    let mut reordered = Vec::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        let mut slide = slides
            .iter()
            .find(|slide| slide.id == *id)
            .cloned()
            .ok_or(CarouselError::SlideNotFound(*id))?;
        let order = u32::try_from(position)
            .map_err(|_| CarouselError::Integrity("Too many slides to order".to_string()))?;
        if slide.order != order {
            slide.order = order;
            store.save_slide(&slide)?;
            changed += 1;
        }
        reordered.push(slide);
    }

    tracing::info!(slider = slider_id, changed, "slides reordered");
    Ok(reordered)
}

fn check_membership(slider_id: &str, slides: &[Slide], ids: &[SlideId]) -> Result<()> {
    let members: HashSet<SlideId> = slides.iter().map(|slide| slide.id).collect();
    let mut seen = HashSet::new();

    for id in ids {
        if !members.contains(id) {
            return Err(CarouselError::Integrity(format!(
                "Slide {} does not belong to slider \"{}\"",
                id, slider_id
            )));
        }
        if !seen.insert(*id) {
            return Err(CarouselError::Integrity(format!(
                "Slide {} is listed more than once",
                id
            )));
        }
    }

    if seen.len() != members.len() {
        let mut missing: Vec<SlideId> = members.difference(&seen).copied().collect();
        missing.sort_unstable();
        let missing: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
        return Err(CarouselError::Integrity(format!(
            "Reorder must list every slide of \"{}\"; missing: {}",
            slider_id,
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Rewrites a slider's order values to `0..n` following the display sequence.
/// Returns how many slides changed.
pub fn renormalize<S: DataStore + ?Sized>(store: &mut S, slider_id: &str) -> Result<usize> {
    let ranked = rank(store.list_slides(slider_id, false)?);
    let mut changed = 0;
    for RankedSlide { rank, mut slide } in ranked {
        let order = u32::try_from(rank)
            .map_err(|_| CarouselError::Integrity("Too many slides to order".to_string()))?;
        if slide.order != order {
            slide.order = order;
            store.save_slide(&slide)?;
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!(slider = slider_id, changed, "order values renormalized");
    }
    Ok(changed)
}
