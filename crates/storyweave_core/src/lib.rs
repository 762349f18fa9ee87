//! Core data types for the Storyweave branching story engine.
//!
//! Two families of types live here: the untrusted raw input shapes a story
//! arrives in, and the canonical pages the engine navigates once the input
//! has been normalized.

mod lenient;
mod page;
mod raw;
mod record;

pub use page::{
    BAD_ENDING, BEST_ENDING, Decision, EndingType, GOOD_ENDING, INTRO, Page, PageBuilder,
    PageBuilderError, STORY,
};
pub use raw::{
    ChoiceSource, RawChoice, RawConnection, RawDecision, RawNode, RawStoryData, SkippedNode,
};
