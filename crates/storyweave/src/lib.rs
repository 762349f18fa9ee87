//! Storyweave: a reader engine for branching interactive stories.
//!
//! A story is a graph of pages joined by reader choices. This crate gathers
//! the workspace into one interface:
//! - [`RawStoryData`] reads whatever shape the story was saved in,
//! - [`StoryGraph`] holds the normalized, immutable pages,
//! - [`StoryReader`] walks the graph with back and restart support.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use storyweave::{PageControls, RawStoryData, ReaderConfig, StoryReader};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let raw = RawStoryData::from_value(json!({
//!     "nodes": [
//!         { "id": "gate", "type": "intro", "content": "A gate.", "decisions": [{ "text": "Enter" }] },
//!         { "id": "yard", "type": "badEnding", "content": "A dog." }
//!     ],
//!     "connections": [{ "sourceId": "gate", "targetId": "yard" }]
//! }))
//! .unwrap();
//!
//! let (reader, _) = StoryReader::open(&raw, ReaderConfig::default()).unwrap();
//! assert!(matches!(reader.controls().await, PageControls::Choices(_)));
//! # }
//! ```

mod load;

pub use load::{StoryFormat, load_story, parse_story};

pub use storyweave_error::{
    ConfigError, JsonError, StoryError, StoryErrorKind, StoryResult, StoryweaveError,
    StoryweaveErrorKind, StoryweaveResult,
};

pub use storyweave_core::{
    BAD_ENDING, BEST_ENDING, ChoiceSource, Decision, EndingType, GOOD_ENDING, INTRO, Page,
    PageBuilder, RawChoice, RawConnection, RawDecision, RawNode, RawStoryData, STORY,
    SkippedNode,
};

pub use storyweave_narrative::{
    ChoiceView, DebugSnapshot, NavigationOutcome, NavigationState, NormalizationTrace,
    NormalizedStory, PageControls, ReaderConfig, Rejection, ResolutionSource, StartRule,
    StartSelection, StoryGraph, StoryReader, TraceEvent, TransitionKind, TransitionRecord,
    controls, is_ending, normalize, select_start, visible_decisions,
};
