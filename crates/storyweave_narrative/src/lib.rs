//! Story graph normalization and reader navigation.
//!
//! Raw story input flows through four stages:
//! - the normalizer turns heterogeneous nodes and connections into a
//!   [`StoryGraph`] of canonical pages,
//! - the start-page selector picks where a reader begins,
//! - the [`StoryReader`] walks the graph, keeping position and history under
//!   a single-flight transition guard,
//! - the ending classifier decides whether a page offers choices or a restart.

mod config;
mod debug;
mod ending;
mod graph;
mod navigation;
mod normalizer;
mod reader;
mod start;
mod trace;

pub use config::{DEFAULT_HIDDEN_CHOICE_TEXT, DEFAULT_TRANSITION_DELAY_MS, ReaderConfig};
pub use debug::{DebugSnapshot, DecisionDebug, HistoryEntry, PagePreview};
pub use ending::{
    ChoiceView, PageControls, controls, is_ending, is_visible_choice, visible_decisions,
};
pub use graph::StoryGraph;
pub use navigation::{NavigationState, TransitionKind, TransitionRecord};
pub use normalizer::{NormalizedStory, normalize};
pub use reader::{NavigationOutcome, Rejection, StoryReader};
pub use start::{StartRule, StartSelection, select_start};
pub use trace::{NormalizationTrace, ResolutionSource, TraceEvent};
