use super::{select_slides, DataStore};
use crate::error::{CarouselError, Result};
use crate::model::{Slide, SlideId, Slider};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
pub struct InMemoryStore {
    sliders: HashMap<String, Slider>,
    index: Vec<String>,
    slides: BTreeMap<SlideId, Slide>,
    next_id: SlideId,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            sliders: HashMap::new(),
            index: Vec::new(),
            slides: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl DataStore for InMemoryStore {
    fn get_slider(&self, id: &str) -> Result<Slider> {
        self.sliders
            .get(id)
            .cloned()
            .ok_or_else(|| CarouselError::SliderNotFound(id.to_string()))
    }

    fn save_slider(&mut self, slider: &Slider) -> Result<()> {
        if !self.index.contains(&slider.id) {
            self.index.push(slider.id.clone());
        }
        self.sliders.insert(slider.id.clone(), slider.clone());
        Ok(())
    }

    fn delete_slider(&mut self, id: &str) -> Result<usize> {
        if !self.sliders.contains_key(id) {
            return Err(CarouselError::SliderNotFound(id.to_string()));
        }
        let before = self.slides.len();
        self.slides.retain(|_, slide| slide.slider_id != id);
        let removed = before - self.slides.len();
        self.index.retain(|slug| slug != id);
        self.sliders.remove(id);
        Ok(removed)
    }

    fn list_sliders(&self) -> Result<Vec<Slider>> {
        Ok(self
            .index
            .iter()
            .filter_map(|slug| self.sliders.get(slug).cloned())
            .collect())
    }

    fn reindex(&mut self) -> Result<Vec<String>> {
        let mut missing: Vec<String> = self
            .sliders
            .keys()
            .filter(|slug| !self.index.contains(slug))
            .cloned()
            .collect();
        missing.sort();
        self.index.extend(missing.iter().cloned());
        Ok(missing)
    }

    fn allocate_slide_id(&mut self) -> Result<SlideId> {
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn get_slide(&self, id: SlideId) -> Result<Slide> {
        self.slides
            .get(&id)
            .cloned()
            .ok_or(CarouselError::SlideNotFound(id))
    }

    fn save_slide(&mut self, slide: &Slide) -> Result<()> {
        if slide.id >= self.next_id {
            self.next_id = slide.id + 1;
        }
        self.slides.insert(slide.id, slide.clone());
        Ok(())
    }

    fn delete_slide(&mut self, id: SlideId) -> Result<()> {
        self.slides
            .remove(&id)
            .map(|_| ())
            .ok_or(CarouselError::SlideNotFound(id))
    }

    fn list_slides(&self, slider_id: &str, active_only: bool) -> Result<Vec<Slide>> {
        Ok(select_slides(self.slides.values(), slider_id, active_only))
    }

    fn list_all_slides(&self) -> Result<Vec<Slide>> {
        Ok(self.slides.values().cloned().collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::merge::new_slide_defaults;
    use crate::model::SliderSettings;
    use chrono::Utc;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn slider(id: &str) -> Slider {
        let now = Utc::now();
        Slider {
            id: id.to_string(),
            name: format!("Slider {}", id),
            settings: SliderSettings::default(),
            created_at: now,
            modified_at: now,
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_slider(mut self, id: &str) -> Self {
            self.store.save_slider(&slider(id)).unwrap();
            self
        }

        /// Adds `count` active slides with orders continuing after the current maximum.
        pub fn with_slides(mut self, slider_id: &str, count: usize) -> Self {
            for _ in 0..count {
                let order = self
                    .store
                    .max_order(slider_id)
                    .unwrap()
                    .map_or(0, |max| max + 1);
                self = self.with_slide_at(slider_id, order, true);
            }
            self
        }

        pub fn with_slide_at(mut self, slider_id: &str, order: u32, active: bool) -> Self {
            let id = self.store.allocate_slide_id().unwrap();
            let mut slide = new_slide_defaults(id, slider_id, order, Utc::now());
            slide.image.asset_id = id;
            slide.image.url = format!("https://cdn.test/{}.jpg", id);
            slide.image.alt = format!("Slide {}", id);
            slide.active = active;
            self.store.save_slide(&slide).unwrap();
            self
        }

        /// A stored configuration the index lost track of.
        pub fn with_unindexed_slider(mut self, id: &str) -> Self {
            self.store.sliders.insert(id.to_string(), slider(id));
            self
        }
    }
}
