//! Reader position and history.

use crate::graph::StoryGraph;
use derive_getters::Getters;
use serde::Serialize;
use storyweave_error::StoryResult;
use tracing::debug;

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum TransitionKind {
    /// Move to a choice's target
    #[display("advance to {}", _0)]
    Advance(String),
    /// Return to the previous page
    #[display("back")]
    Back,
    /// Return to the start page and forget the path
    #[display("restart")]
    Restart,
}

/// A transition that has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct TransitionRecord {
    /// What was requested
    kind: TransitionKind,
    /// Position before
    from: String,
    /// Position after
    to: String,
    /// History length after
    history_len: usize,
}

/// Where the reader is and how they got there.
///
/// `history` is never empty and its last entry is always `position`.
///
/// # Examples
///
/// ```
/// use storyweave_narrative::NavigationState;
///
/// let mut state = NavigationState::new("start");
/// assert!(!state.can_go_back());
/// state.push("hall");
/// assert!(state.can_go_back());
/// assert!(state.pop());
/// assert!(!state.pop());
/// assert_eq!(state.position(), "start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct NavigationState {
    /// Current page
    position: String,
    /// Visited pages, most recent last
    history: Vec<String>,
    /// Image shown on the current page
    image_index: usize,
}

impl NavigationState {
    /// Starts a walk at `start`.
    pub fn new(start: impl Into<String>) -> Self {
        let start = start.into();
        Self {
            history: vec![start.clone()],
            position: start,
            image_index: 0,
        }
    }

    /// Whether there is a page to go back to.
    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Moves forward to `id`.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.history.push(id.clone());
        self.position = id;
        self.image_index = 0;
    }

    /// Steps back one page. Refuses, returning false, at the start of the walk.
    pub fn pop(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.history.pop();
        if let Some(previous) = self.history.last() {
            self.position.clone_from(previous);
        }
        self.image_index = 0;
        true
    }

    /// Forgets the path and stands on `start`.
    pub fn reset(&mut self, start: impl Into<String>) {
        *self = Self::new(start);
    }

    /// Shows the next image of `count`, wrapping around. Single-image and
    /// image-less pages stay put.
    pub fn next_image(&mut self, count: usize) -> usize {
        if count > 1 {
            self.image_index = (self.image_index + 1) % count;
        }
        self.image_index
    }

    /// Jumps to image `index` of `count`; out-of-range indices are refused.
    pub fn set_image_index(&mut self, index: usize, count: usize) -> bool {
        if index == 0 || index < count {
            self.image_index = index;
            true
        } else {
            false
        }
    }

    /// Applies a transition against `graph`.
    ///
    /// Advance targets are expected to have been checked against the graph
    /// already; the graph never changes, so the check still holds here.
    ///
    /// # Errors
    ///
    /// Restart fails when no start page can be selected.
    pub fn apply(
        &mut self,
        graph: &StoryGraph,
        kind: &TransitionKind,
    ) -> StoryResult<TransitionRecord> {
        let from = self.position.clone();
        match kind {
            TransitionKind::Advance(target) => self.push(target.clone()),
            TransitionKind::Back => {
                if !self.pop() {
                    debug!("Back requested at start of history");
                }
            }
            TransitionKind::Restart => {
                let start = graph.start()?;
                debug!(start = %start.id(), rule = %start.rule, "Restarting");
                self.reset(start.id());
            }
        }
        debug_assert_eq!(self.history.last(), Some(&self.position));
        Ok(TransitionRecord {
            kind: kind.clone(),
            from,
            to: self.position.clone(),
            history_len: self.history.len(),
        })
    }
}
