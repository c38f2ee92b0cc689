//! Authorization gate for mutating operations.
//!
//! Every mutation is checked twice before anything else happens:
//!
//! 1. the caller must hold the management capability, and
//! 2. the request must carry a valid anti-forgery token bound to the action.
//!
//! Reads and rendering are never gated.
//!
//! [`SignedTokenGate`] issues tokens as a hex HMAC-SHA256 of the action name
//! under a per-installation secret (see [`crate::config::CarouselConfig`]).

use crate::error::{CarouselError, Result};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "carousel_admin_action_";

/// The mutations a token can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateSlider,
    UpdateSlider,
    DeleteSlider,
    SaveSlide,
    DeleteSlide,
    ReorderSlides,
    ToggleSlide,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::CreateSlider,
        Action::UpdateSlider,
        Action::DeleteSlider,
        Action::SaveSlide,
        Action::DeleteSlide,
        Action::ReorderSlides,
        Action::ToggleSlide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateSlider => "create_slider",
            Action::UpdateSlider => "update_slider",
            Action::DeleteSlider => "delete_slider",
            Action::SaveSlide => "save_slide",
            Action::DeleteSlide => "delete_slide",
            Action::ReorderSlides => "reorder_slides",
            Action::ToggleSlide => "toggle_slide",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub trait Gatekeeper {
    /// Whether the current caller may manage sliders at all.
    fn can_manage(&self) -> bool;

    fn verify_token(&self, token: &str, action: Action) -> bool;
}

/// Capability first, then token. Nothing else may run before this returns `Ok`.
pub fn authorize<G: Gatekeeper + ?Sized>(gate: &G, token: &str, action: Action) -> Result<()> {
    if !gate.can_manage() {
        tracing::warn!(%action, "rejected: caller lacks the manage capability");
        return Err(CarouselError::Unauthorized);
    }
    if !gate.verify_token(token, action) {
        tracing::warn!(%action, "rejected: anti-forgery token mismatch");
        return Err(CarouselError::InvalidToken(action));
    }
    Ok(())
}

pub struct SignedTokenGate {
    secret: Vec<u8>,
    can_manage: bool,
}

impl SignedTokenGate {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            can_manage: true,
        }
    }

    pub fn with_capability(mut self, can_manage: bool) -> Self {
        self.can_manage = can_manage;
        self
    }

    fn mac(&self, action: Action) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(TOKEN_PREFIX.as_bytes());
        mac.update(action.as_str().as_bytes());
        Some(mac)
    }

    /// Token a trusted client sends along with `action`.
    pub fn issue(&self, action: Action) -> String {
        self.mac(action)
            .map(|mac| hex::encode(mac.finalize().into_bytes()))
            .unwrap_or_default()
    }
}

impl Gatekeeper for SignedTokenGate {
    fn can_manage(&self) -> bool {
        self.can_manage
    }

    fn verify_token(&self, token: &str, action: Action) -> bool {
        let Ok(provided) = hex::decode(token.trim()) else {
            return false;
        };
        match self.mac(action) {
            Some(mac) => !provided.is_empty() && mac.verify_slice(&provided).is_ok(),
            None => false,
        }
    }
}

/// Grants everything. For tests and trusted in-process callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Gatekeeper for AllowAll {
    fn can_manage(&self) -> bool {
        true
    }

    fn verify_token(&self, _token: &str, _action: Action) -> bool {
        true
    }
}

/// Generates a fresh hex secret for token signing.
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}
