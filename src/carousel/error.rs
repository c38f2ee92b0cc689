use crate::model::SlideId;
use crate::security::Action;
use thiserror::Error;

/// Human-readable problems found while validating a request.
///
/// Always recoverable: nothing has been written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join(" "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Slider not found: {0}")]
    SliderNotFound(String),

    #[error("Slide not found: {0}")]
    SlideNotFound(SlideId),

    #[error("A slider with the id \"{0}\" already exists")]
    SliderExists(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("You do not have sufficient permissions to manage sliders")]
    Unauthorized,

    #[error("Security check failed for {0}, refresh and try again")]
    InvalidToken(Action),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl CarouselError {
    /// True for rejections coming from the capability or anti-forgery gate.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::InvalidToken(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SliderNotFound(_) | Self::SlideNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CarouselError>;
