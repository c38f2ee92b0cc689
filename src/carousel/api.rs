//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every carousel operation, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Authorizes** every mutation before anything else runs
//! - **Normalizes inputs** (slider ids are trimmed and lowercased)
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O operations**: no stdout, stderr, or file formatting
//! - **Presentation concerns**: returns data structures, not strings
//!
//! ## Authorization
//!
//! Each mutating method takes the caller's anti-forgery token and checks it
//! with [`security::authorize`] against the method's [`Action`]. A rejected
//! request returns [`CarouselError::Unauthorized`] or
//! [`CarouselError::InvalidToken`] and has not read or written anything.
//!
//! Listing, rendering and availability checks are never gated. Neither is
//! [`CarouselApi::doctor`], which is a maintenance tool for whoever owns the
//! data directory rather than an admin action.
//!
//! [`CarouselError::Unauthorized`]: crate::error::CarouselError::Unauthorized
//! [`CarouselError::InvalidToken`]: crate::error::CarouselError::InvalidToken
//!
//! ## Generic Over Collaborators
//!
//! `CarouselApi<S, A, G>` is generic over the store, the asset resolver and
//! the gatekeeper:
//! - Production: `CarouselApi<FileStore, AssetCatalog, SignedTokenGate>`
//! - Testing: `CarouselApi<InMemoryStore, AssetCatalog, AllowAll>`

use crate::assets::AssetResolver;
use crate::commands;
use crate::embed::DEFAULT_TAG;
use crate::error::Result;
use crate::form::FormInput;
use crate::model::SlideId;
use crate::render::Renderer;
use crate::sanitize::sanitize_slider_id;
use crate::security::{self, Action, Gatekeeper};
use crate::store::DataStore;
use std::path::Path;

pub struct CarouselApi<S: DataStore, A: AssetResolver, G: Gatekeeper> {
    store: S,
    assets: A,
    gate: G,
    renderer: Renderer,
    embed_tag: String,
}

impl<S: DataStore, A: AssetResolver, G: Gatekeeper> CarouselApi<S, A, G> {
    pub fn new(store: S, assets: A, gate: G) -> Result<Self> {
        Ok(Self {
            store,
            assets,
            gate,
            renderer: Renderer::new()?,
            embed_tag: DEFAULT_TAG.to_string(),
        })
    }

    pub fn with_embed_tag(mut self, tag: impl Into<String>) -> Self {
        self.embed_tag = tag.into();
        self
    }

    pub fn embed_tag(&self) -> &str {
        &self.embed_tag
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Sliders ---

    pub fn create_slider(&mut self, token: &str, form: &FormInput) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::CreateSlider)?;
        commands::create_slider::run(&mut self.store, form)
    }

    pub fn update_slider(
        &mut self,
        token: &str,
        slider_id: &str,
        form: &FormInput,
    ) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::UpdateSlider)?;
        commands::update_slider::run(&mut self.store, &sanitize_slider_id(slider_id), form)
    }

    pub fn delete_slider(&mut self, token: &str, slider_id: &str) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::DeleteSlider)?;
        commands::delete_slider::run(&mut self.store, &sanitize_slider_id(slider_id))
    }

    pub fn list_sliders(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, &self.embed_tag)
    }

    pub fn show_slider(&self, slider_id: &str) -> Result<commands::CmdResult> {
        commands::show::run(&self.store, &sanitize_slider_id(slider_id), &self.embed_tag)
    }

    pub fn is_slider_id_available(&self, slider_id: &str) -> Result<bool> {
        commands::create_slider::is_id_available(&self.store, slider_id)
    }

    // --- Slides ---

    pub fn add_slide(&mut self, token: &str, form: &FormInput) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::SaveSlide)?;
        commands::save_slide::create(&mut self.store, &self.assets, form)
    }

    pub fn edit_slide(
        &mut self,
        token: &str,
        slide_id: SlideId,
        form: &FormInput,
    ) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::SaveSlide)?;
        commands::save_slide::update(&mut self.store, &self.assets, slide_id, form)
    }

    pub fn remove_slide(&mut self, token: &str, slide_id: SlideId) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::DeleteSlide)?;
        commands::remove_slide::run(&mut self.store, slide_id)
    }

    pub fn reorder_slides(
        &mut self,
        token: &str,
        slider_id: &str,
        ids: &[SlideId],
    ) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::ReorderSlides)?;
        commands::reorder::run(&mut self.store, &sanitize_slider_id(slider_id), ids)
    }

    /// `None` flips the current state.
    pub fn toggle_slide(
        &mut self,
        token: &str,
        slide_id: SlideId,
        active: Option<bool>,
    ) -> Result<commands::CmdResult> {
        security::authorize(&self.gate, token, Action::ToggleSlide)?;
        commands::toggle::run(&mut self.store, &self.assets, slide_id, active)
    }

    // --- Rendering ---

    /// Renders the given sliders as if embedded one after another on a page.
    pub fn render<I: AsRef<str>>(&self, slider_ids: &[I]) -> Result<commands::CmdResult> {
        let ids: Vec<String> = slider_ids.iter().map(|id| id.as_ref().to_string()).collect();
        commands::render::run(&self.store, &self.renderer, &ids)
    }

    pub fn render_page(&self, page: &str) -> Result<commands::CmdResult> {
        commands::render::run_page(&self.store, &self.renderer, page, &self.embed_tag)
    }

    // --- Maintenance ---

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store)
    }

    pub fn config(
        &self,
        data_dir: &Path,
        action: commands::config::ConfigAction,
    ) -> Result<commands::CmdResult> {
        commands::config::run(data_dir, action)
    }
}
