//! # Carousel Architecture
//!
//! Carousel is a **UI-agnostic slider library**: it stores image carousels
//! (sliders and their slides), validates every change to them, and renders
//! them into embeddable HTML. The `carousel` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Authorization gate for every mutation                    │
//! │  - Normalizes inputs, dispatches to commands                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - sanitize → merge → ordering → store                      │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait, sliders and slides             │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Write Path
//!
//! Every mutation goes through the same steps, and nothing is written until
//! all of them succeed:
//!
//! 1. [`security::authorize`]: capability, then anti-forgery token
//! 2. [`sanitize`]: raw [`form::FormInput`] to a typed patch, or a
//!    [`error::ValidationError`] listing every problem
//! 3. [`merge`]: patch + stored record (or defaults) to the new record
//! 4. [`ordering`]: order values for new or reordered slides
//! 5. [`store`]: persist
//!
//! ## The Read Path
//!
//! Rendering never writes. [`render::Renderer`] turns a slider and its active
//! slides into a fragment, escaping every value for the context it lands in
//! ([`escape`]). A [`render::RenderContext`] lives for one page and hands out
//! unique element ids, so the same slider can be embedded twice. [`embed`]
//! finds `[carousel id="..."]` placeholders in a page and expands them.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//!
//! ## Testing Strategy
//!
//! 1. **Commands and engines**: unit tests next to the code, against
//!    `InMemoryStore` and its fixtures.
//! 2. **API**: dispatch and authorization tests.
//! 3. **Integration** (`tests/`): `FileStore` on disk and the binary end to end.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Sliders, slides and their settings
//! - [`form`]: Raw request payloads
//! - [`sanitize`]: Input normalization and validation
//! - [`merge`]: Applying patches to stored records
//! - [`ordering`]: Slide order values and ranks
//! - [`render`], [`escape`], [`embed`]: HTML output
//! - [`assets`]: Asset id to image URL resolution
//! - [`security`]: Capability and token checks
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal output for the binary (not part of the lib API)

pub mod api;
pub mod assets;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod escape;
pub mod form;
pub mod merge;
pub mod model;
pub mod ordering;
pub mod render;
pub mod sanitize;
pub mod security;
pub mod store;
