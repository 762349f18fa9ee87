//! Structural story errors.

/// Specific error conditions that make a story session unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// Input carried no `nodes` array
    #[display("Story data is missing a nodes array")]
    MissingNodes,
    /// The story source could not be read
    #[display("Story file could not be read: {}", _0)]
    Unreadable(String),
    /// Input was not shaped like story data at all
    #[display("Invalid story data: {}", _0)]
    InvalidShape(String),
    /// Normalization produced no pages
    #[display("Story graph contains no pages")]
    EmptyGraph,
    /// Start-page selection found nothing
    #[display("No valid starting page found in the story data")]
    NoStartPage,
    /// A pending transition was cancelled before it ran
    #[display("Transition was cancelled before it completed")]
    TransitionAborted,
    /// A pending transition task failed
    #[display("Transition task failed: {}", _0)]
    TransitionPanicked(String),
}

/// Error type for story loading and navigation.
///
/// # Examples
///
/// ```
/// use storyweave_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::MissingNodes);
/// assert!(format!("{}", err).contains("nodes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the error means the session must not be used further.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            StoryErrorKind::MissingNodes
                | StoryErrorKind::Unreadable(_)
                | StoryErrorKind::InvalidShape(_)
                | StoryErrorKind::EmptyGraph
                | StoryErrorKind::NoStartPage
        )
    }
}

/// Result type for story operations.
pub type StoryResult<T> = std::result::Result<T, StoryError>;
