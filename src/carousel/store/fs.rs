use super::{select_slides, DataStore};
use crate::error::{CarouselError, Result};
use crate::model::{Slide, SlideId, Slider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SLIDERS_FILE: &str = "sliders.json";
const INDEX_FILE: &str = "index.json";
const SLIDES_FILE: &str = "slides.json";

#[derive(Debug, Serialize, Deserialize)]
struct SlidesDocument {
    next_id: SlideId,
    slides: BTreeMap<SlideId, Slide>,
}

impl Default for SlidesDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            slides: BTreeMap::new(),
        }
    }
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CarouselError::Io)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path).map_err(CarouselError::Io)?;
        let value = serde_json::from_str(&content).map_err(CarouselError::Serialization)?;
        Ok(value)
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let target = self.root.join(name);
        let content = serde_json::to_string_pretty(value).map_err(CarouselError::Serialization)?;

        // Atomic write
        let stem = name.trim_end_matches(".json");
        let tmp_file = self.root.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(CarouselError::Io)?;
        fs::rename(&tmp_file, &target).map_err(CarouselError::Io)?;
        Ok(())
    }

    fn load_sliders(&self) -> Result<BTreeMap<String, Slider>> {
        self.load(SLIDERS_FILE)
    }

    fn load_index(&self) -> Result<Vec<String>> {
        self.load(INDEX_FILE)
    }

    fn load_slides(&self) -> Result<SlidesDocument> {
        self.load(SLIDES_FILE)
    }
}

impl DataStore for FileStore {
    fn get_slider(&self, id: &str) -> Result<Slider> {
        self.load_sliders()?
            .remove(id)
            .ok_or_else(|| CarouselError::SliderNotFound(id.to_string()))
    }

    fn save_slider(&mut self, slider: &Slider) -> Result<()> {
        let mut sliders = self.load_sliders()?;
        sliders.insert(slider.id.clone(), slider.clone());
        self.save(SLIDERS_FILE, &sliders)?;

        let mut index = self.load_index()?;
        if !index.contains(&slider.id) {
            index.push(slider.id.clone());
            self.save(INDEX_FILE, &index)?;
        }
        Ok(())
    }

    fn delete_slider(&mut self, id: &str) -> Result<usize> {
        let mut sliders = self.load_sliders()?;
        if !sliders.contains_key(id) {
            return Err(CarouselError::SliderNotFound(id.to_string()));
        }

        // 1. Slides
        let mut doc = self.load_slides()?;
        let before = doc.slides.len();
        doc.slides.retain(|_, slide| slide.slider_id != id);
        let removed = before - doc.slides.len();
        if removed > 0 {
            self.save(SLIDES_FILE, &doc)?;
        }

        // 2. Index entry
        let mut index = self.load_index()?;
        index.retain(|slug| slug != id);
        self.save(INDEX_FILE, &index)?;

        // 3. Configuration
        sliders.remove(id);
        self.save(SLIDERS_FILE, &sliders)?;

        Ok(removed)
    }

    fn list_sliders(&self) -> Result<Vec<Slider>> {
        let sliders = self.load_sliders()?;
        Ok(self
            .load_index()?
            .iter()
            .filter_map(|slug| sliders.get(slug).cloned())
            .collect())
    }

    fn reindex(&mut self) -> Result<Vec<String>> {
        let sliders = self.load_sliders()?;
        let mut index = self.load_index()?;
        let missing: Vec<String> = sliders
            .keys()
            .filter(|slug| !index.contains(slug))
            .cloned()
            .collect();
        if !missing.is_empty() {
            index.extend(missing.iter().cloned());
            self.save(INDEX_FILE, &index)?;
        }
        Ok(missing)
    }

    fn allocate_slide_id(&mut self) -> Result<SlideId> {
        let mut doc = self.load_slides()?;
        let id = doc.next_id;
        doc.next_id += 1;
        self.save(SLIDES_FILE, &doc)?;
        Ok(id)
    }

    fn get_slide(&self, id: SlideId) -> Result<Slide> {
        self.load_slides()?
            .slides
            .remove(&id)
            .ok_or(CarouselError::SlideNotFound(id))
    }

    fn save_slide(&mut self, slide: &Slide) -> Result<()> {
        let mut doc = self.load_slides()?;
        if slide.id >= doc.next_id {
            doc.next_id = slide.id + 1;
        }
        doc.slides.insert(slide.id, slide.clone());
        self.save(SLIDES_FILE, &doc)
    }

    fn delete_slide(&mut self, id: SlideId) -> Result<()> {
        let mut doc = self.load_slides()?;
        if doc.slides.remove(&id).is_none() {
            return Err(CarouselError::SlideNotFound(id));
        }
        self.save(SLIDES_FILE, &doc)
    }

    fn list_slides(&self, slider_id: &str, active_only: bool) -> Result<Vec<Slide>> {
        let doc = self.load_slides()?;
        Ok(select_slides(doc.slides.values(), slider_id, active_only))
    }

    fn list_all_slides(&self) -> Result<Vec<Slide>> {
        Ok(self.load_slides()?.slides.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::slider;
    use tempfile::tempdir;

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.list_sliders().unwrap().is_empty());
        assert!(store.list_all_slides().unwrap().is_empty());
    }

    #[test]
    fn saving_creates_the_data_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");
        let mut store = FileStore::new(root.clone());
        store.save_slider(&slider("home")).unwrap();
        assert!(root.join(SLIDERS_FILE).exists());
        assert!(root.join(INDEX_FILE).exists());
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.save_slider(&slider("home")).unwrap();
        store.allocate_slide_id().unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
