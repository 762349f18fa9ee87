//! Error types for the Storyweave story engine.
//!
//! Every error records the source location where it was constructed, so a
//! structural failure reported by the reader can be traced back to the check
//! that raised it.

mod config;
mod json;
mod story;

pub use config::ConfigError;
pub use json::JsonError;
pub use story::{StoryError, StoryErrorKind, StoryResult};

/// Crate-level error variants.
#[derive(Debug, Clone, derive_more::From, derive_more::Display)]
pub enum StoryweaveErrorKind {
    /// Structural story error
    #[display("{}", _0)]
    Story(StoryError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Raw JSON could not be parsed
    #[display("{}", _0)]
    Json(JsonError),
}

/// Storyweave error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyweave_error::{StoryError, StoryErrorKind, StoryweaveError, StoryweaveErrorKind};
///
/// let err: StoryweaveError = StoryError::new(StoryErrorKind::EmptyGraph).into();
/// assert!(matches!(err.kind(), StoryweaveErrorKind::Story(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display)]
#[display("Storyweave Error: {}", _0)]
pub struct StoryweaveError(Box<StoryweaveErrorKind>);

impl StoryweaveError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryweaveErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryweaveErrorKind {
        &self.0
    }
}

impl std::error::Error for StoryweaveError {}

impl<T> From<T> for StoryweaveError
where
    T: Into<StoryweaveErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyweave operations.
pub type StoryweaveResult<T> = std::result::Result<T, StoryweaveError>;
