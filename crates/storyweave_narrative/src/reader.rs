//! The navigation controller.
//!
//! Transitions are time-extended: an accepted request marks the reader busy,
//! waits out the fade delay on a spawned task, then applies its mutation and
//! clears the flag. Requests arriving while busy are rejected rather than
//! queued or pre-empting, so no caller ever observes a half-applied move.

use crate::config::ReaderConfig;
use crate::debug::DebugSnapshot;
use crate::ending::{PageControls, controls};
use crate::graph::StoryGraph;
use crate::navigation::{NavigationState, TransitionKind, TransitionRecord};
use crate::trace::NormalizationTrace;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use storyweave_core::{Page, RawStoryData};
use storyweave_error::{StoryError, StoryErrorKind, StoryResult};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Why a request was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(tag = "reason", content = "target", rename_all = "snake_case")]
pub enum Rejection {
    /// Another transition is in flight
    #[display("a transition is already in progress")]
    Busy,
    /// The choice has no target
    #[display("choice has no target")]
    MissingTarget,
    /// The target names no page
    #[display("no page named '{}'", _0)]
    UnknownTarget(String),
    /// Already at the first page of the walk
    #[display("already at the start of the story")]
    AtStart,
}

/// Immediate answer to a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// The transition will apply after the fade delay
    Scheduled(TransitionKind),
    /// Nothing happened
    Rejected(Rejection),
}

impl NavigationOutcome {
    /// Whether the request was accepted.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }
}

#[derive(Debug)]
struct ReaderState {
    navigation: NavigationState,
    busy: bool,
}

type PendingTransition = JoinHandle<StoryResult<TransitionRecord>>;

/// Walks a [`StoryGraph`] one page at a time.
///
/// Dropping the reader cancels any transition still waiting out its delay.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use storyweave_core::RawStoryData;
/// use storyweave_narrative::{ReaderConfig, StoryReader};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let raw = RawStoryData::from_value(json!({
///     "nodes": [
///         { "id": "a", "pageNumber": "1", "content": "Door", "choices": [{ "text": "Open", "nextPage": "b" }] },
///         { "id": "b", "content": "Treasure", "type": "bestEnding" }
///     ]
/// }))
/// .unwrap();
///
/// let config = ReaderConfig::default().with_transition_delay_ms(0);
/// let (reader, _trace) = StoryReader::open(&raw, config).unwrap();
/// assert!(reader.advance(Some("b")).await.is_scheduled());
/// reader.settle().await.unwrap().unwrap();
/// assert_eq!(reader.position().await, "b");
/// # }
/// ```
#[derive(Debug)]
pub struct StoryReader {
    graph: Arc<StoryGraph>,
    config: ReaderConfig,
    state: Arc<RwLock<ReaderState>>,
    pending: Mutex<Option<PendingTransition>>,
}

impl StoryReader {
    /// Normalizes `raw` and opens a reader on its start page.
    ///
    /// # Errors
    ///
    /// Structural errors only: an empty graph or no selectable start page.
    #[instrument(skip_all)]
    pub fn open(
        raw: &RawStoryData,
        config: ReaderConfig,
    ) -> StoryResult<(Self, NormalizationTrace)> {
        let (graph, mut trace) = StoryGraph::from_raw(raw)?;
        let reader = Self::new(Arc::new(graph), config)?;
        let start = reader.graph.start()?;
        trace.record_start(start.id(), start.rule);
        Ok((reader, trace))
    }

    /// Opens a reader on an existing graph.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::NoStartPage`] if no start page can be selected.
    pub fn new(graph: Arc<StoryGraph>, config: ReaderConfig) -> StoryResult<Self> {
        let start = graph.start()?;
        info!(
            start = %start.id(),
            title = start.page.display_title(),
            rule = %start.rule,
            pages = graph.len(),
            "Opening story"
        );
        let navigation = NavigationState::new(start.id());

        Ok(Self {
            graph,
            config,
            state: Arc::new(RwLock::new(ReaderState {
                navigation,
                busy: false,
            })),
            pending: Mutex::new(None),
        })
    }

    /// The graph being read.
    pub fn graph(&self) -> &Arc<StoryGraph> {
        &self.graph
    }

    /// The session configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Identifier of the current page.
    pub async fn position(&self) -> String {
        self.state.read().await.navigation.position().clone()
    }

    /// The current page.
    pub async fn current_page(&self) -> Option<&Page> {
        let position = self.position().await;
        self.graph.page(&position)
    }

    /// Visited pages, most recent last.
    pub async fn history(&self) -> Vec<String> {
        self.state.read().await.navigation.history().clone()
    }

    /// Snapshot of position, history and image index.
    pub async fn navigation(&self) -> NavigationState {
        self.state.read().await.navigation.clone()
    }

    /// Whether the "previous" control should be enabled.
    pub async fn can_go_back(&self) -> bool {
        self.state.read().await.navigation.can_go_back()
    }

    /// Whether a transition is in flight.
    pub async fn is_busy(&self) -> bool {
        self.state.read().await.busy
    }

    /// Image shown on the current page.
    pub async fn image_index(&self) -> usize {
        *self.state.read().await.navigation.image_index()
    }

    /// Cycles to the next image on the current page.
    pub async fn next_image(&self) -> usize {
        let mut state = self.state.write().await;
        let count = self.image_count(state.navigation.position());
        state.navigation.next_image(count)
    }

    /// Shows image `index` of the current page, if it exists.
    pub async fn set_image_index(&self, index: usize) -> bool {
        let mut state = self.state.write().await;
        let count = self.image_count(state.navigation.position());
        state.navigation.set_image_index(index, count)
    }

    /// Controls for the current page.
    pub async fn controls(&self) -> PageControls {
        match self.current_page().await {
            Some(page) => controls(page, self.config.hidden_choice_text()),
            None => PageControls::EndOfBranch,
        }
    }

    /// Debug overlay data for the current state.
    pub async fn debug_snapshot(&self) -> DebugSnapshot {
        let state = self.state.read().await;
        DebugSnapshot::capture(&self.graph, &state.navigation, state.busy, &self.config)
    }

    /// Moves to a choice's target.
    ///
    /// Rejected when the target is missing, names no page, or another
    /// transition is in flight.
    #[instrument(skip(self))]
    pub async fn advance(&self, target_id: Option<&str>) -> NavigationOutcome {
        let Some(target) = target_id else {
            warn!("Choice has no target, ignoring");
            return NavigationOutcome::Rejected(Rejection::MissingTarget);
        };
        if !self.graph.contains(target) {
            warn!(target_id = target, "Target page not found, ignoring");
            return NavigationOutcome::Rejected(Rejection::UnknownTarget(target.to_string()));
        }
        self.schedule(TransitionKind::Advance(target.to_string()))
            .await
    }

    /// Returns to the previous page.
    #[instrument(skip(self))]
    pub async fn go_back(&self) -> NavigationOutcome {
        self.schedule(TransitionKind::Back).await
    }

    /// Returns to the start page with a fresh history.
    #[instrument(skip(self))]
    pub async fn restart(&self) -> NavigationOutcome {
        self.schedule(TransitionKind::Restart).await
    }

    /// Waits for the in-flight transition, if any, and returns its result.
    ///
    /// This is where deferred failures surface. The busy flag is already
    /// clear by the time an error is returned.
    pub async fn settle(&self) -> Option<StoryResult<TransitionRecord>> {
        let handle = self.pending.lock().await.take()?;
        Some(match handle.await {
            Ok(result) => result,
            Err(join_error) if join_error.is_cancelled() => {
                self.state.write().await.busy = false;
                Err(StoryError::new(StoryErrorKind::TransitionAborted))
            }
            Err(join_error) => {
                self.state.write().await.busy = false;
                error!(error = %join_error, "Transition task failed");
                Err(StoryError::new(StoryErrorKind::TransitionPanicked(
                    join_error.to_string(),
                )))
            }
        })
    }

    /// Cancels a transition still waiting out its delay.
    ///
    /// Returns true if a transition was cancelled before it applied; position
    /// and history are then exactly as they were before the request.
    pub async fn cancel_pending(&self) -> bool {
        let Some(handle) = self.pending.lock().await.take() else {
            return false;
        };
        handle.abort();
        match handle.await {
            Err(join_error) if join_error.is_cancelled() => {
                self.state.write().await.busy = false;
                debug!("Cancelled pending transition");
                true
            }
            Ok(_) => false,
            Err(join_error) => {
                self.state.write().await.busy = false;
                error!(error = %join_error, "Transition task failed");
                false
            }
        }
    }

    fn image_count(&self, position: &str) -> usize {
        self.graph.page(position).map_or(0, Page::image_count)
    }

    async fn schedule(&self, kind: TransitionKind) -> NavigationOutcome {
        let mut pending = self.pending.lock().await;
        {
            let mut state = self.state.write().await;
            if state.busy {
                debug!(%kind, "Transition in progress, ignoring request");
                return NavigationOutcome::Rejected(Rejection::Busy);
            }
            if kind == TransitionKind::Back && !state.navigation.can_go_back() {
                debug!("Already at start, ignoring back request");
                return NavigationOutcome::Rejected(Rejection::AtStart);
            }
            state.busy = true;
        }

        let handle = tokio::spawn(run_transition(
            Arc::clone(&self.graph),
            Arc::clone(&self.state),
            kind.clone(),
            self.config.transition_delay(),
        ));
        // Any previous handle finished before busy was cleared; dropping it detaches.
        *pending = Some(handle);

        debug!(%kind, delay_ms = self.config.transition_delay_ms(), "Transition scheduled");
        NavigationOutcome::Scheduled(kind)
    }
}

impl Drop for StoryReader {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_transition(
    graph: Arc<StoryGraph>,
    state: Arc<RwLock<ReaderState>>,
    kind: TransitionKind,
    delay: Duration,
) -> StoryResult<TransitionRecord> {
    tokio::time::sleep(delay).await;

    let mut state = state.write().await;
    let result = state.navigation.apply(&graph, &kind);
    state.busy = false;

    match &result {
        Ok(record) => info!(
            from = %record.from(),
            to = %record.to(),
            history_len = record.history_len(),
            "Transition applied"
        ),
        Err(e) => error!(error = %e, %kind, "Transition failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyweave_core::{Decision, Page};

    fn reader() -> StoryReader {
        let graph = StoryGraph::from_page_list(vec![
            Page::new("gate", "A gate.")
                .with_decisions(vec![Decision::new("Enter", Some("yard".to_string()))]),
            Page::new("yard", "A yard."),
        ])
        .expect("Graph should build");
        StoryReader::new(Arc::new(graph), ReaderConfig::default()).expect("Reader should open")
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_transition() {
        let reader = reader();
        let state = Arc::clone(&reader.state);

        assert!(reader.advance(Some("yard")).await.is_scheduled());
        drop(reader);

        tokio::time::advance(Duration::from_millis(1000)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let state = state.read().await;
        assert_eq!(state.navigation.position(), "gate");
        assert_eq!(state.navigation.history(), &vec!["gate"]);
        // The aborted task never reached the point where busy is cleared
        assert!(state.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_transition_is_not_undone_by_drop() {
        let reader = reader();
        let state = Arc::clone(&reader.state);

        assert!(reader.advance(Some("yard")).await.is_scheduled());
        reader
            .settle()
            .await
            .expect("Transition should be pending")
            .expect("Transition should apply");
        drop(reader);

        let state = state.read().await;
        assert_eq!(state.navigation.position(), "yard");
        assert!(!state.busy);
    }
}
