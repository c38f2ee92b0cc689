//! # Storage Layer
//!
//! One store holds two record kinds: slider configurations keyed by slug, and
//! slides keyed by a store-generated numeric id. The [`DataStore`] trait is
//! the only thing commands see.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, JSON documents in a data directory
//! - [`memory::InMemoryStore`]: no persistence, used by unit tests
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data-dir>/
//! ├── sliders.json   # slug -> slider configuration
//! ├── index.json     # known slugs, in creation order
//! ├── slides.json    # { next_id, slides: id -> slide }
//! ├── assets.json    # asset id -> url (read-only here)
//! └── config.json    # CarouselConfig
//! ```
//!
//! Slides are always returned sorted by `(order, id)`. `order` values may have
//! gaps or duplicates; the id tie-breaker keeps the sequence deterministic.

use crate::error::{CarouselError, Result};
use crate::model::{Slide, SlideId, Slider};

pub mod fs;
pub mod memory;

pub trait DataStore {
    /// `SliderNotFound` when the slug is unknown.
    fn get_slider(&self, id: &str) -> Result<Slider>;

    /// Insert or replace, registering new slugs in the index.
    fn save_slider(&mut self, slider: &Slider) -> Result<()>;

    /// Removes the slider and every slide it owns. Returns the number of
    /// slides removed.
    fn delete_slider(&mut self, id: &str) -> Result<usize>;

    /// Sliders in index order.
    fn list_sliders(&self) -> Result<Vec<Slider>>;

    /// Registers stored slider configurations the index does not know about.
    /// Returns the slugs added.
    fn reindex(&mut self) -> Result<Vec<String>>;

    /// Next slide id. Ids are never handed out twice.
    fn allocate_slide_id(&mut self) -> Result<SlideId>;

    fn get_slide(&self, id: SlideId) -> Result<Slide>;

    fn save_slide(&mut self, slide: &Slide) -> Result<()>;

    fn delete_slide(&mut self, id: SlideId) -> Result<()>;

    /// Slides of one slider, sorted by `(order, id)`.
    fn list_slides(&self, slider_id: &str, active_only: bool) -> Result<Vec<Slide>>;

    /// Every stored slide regardless of owner, sorted by id.
    fn list_all_slides(&self) -> Result<Vec<Slide>>;

    fn slider_exists(&self, id: &str) -> Result<bool> {
        match self.get_slider(id) {
            Ok(_) => Ok(true),
            Err(CarouselError::SliderNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn max_order(&self, slider_id: &str) -> Result<Option<u32>> {
        Ok(self
            .list_slides(slider_id, false)?
            .iter()
            .map(|slide| slide.order)
            .max())
    }

    fn count_slides(&self, slider_id: &str, active_only: bool) -> Result<usize> {
        Ok(self.list_slides(slider_id, active_only)?.len())
    }
}

/// Display order: `order` ascending, id as the tie-breaker.
pub fn sort_slides(slides: &mut [Slide]) {
    slides.sort_by_key(|slide| (slide.order, slide.id));
}

pub(crate) fn select_slides<'a>(
    slides: impl Iterator<Item = &'a Slide>,
    slider_id: &str,
    active_only: bool,
) -> Vec<Slide> {
    let mut selected: Vec<Slide> = slides
        .filter(|slide| slide.slider_id == slider_id && (!active_only || slide.active))
        .cloned()
        .collect();
    sort_slides(&mut selected);
    selected
}
