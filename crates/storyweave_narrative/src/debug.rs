//! Debug overlay data.

use crate::config::ReaderConfig;
use crate::ending::is_ending;
use crate::graph::StoryGraph;
use crate::navigation::NavigationState;
use derive_getters::Getters;
use serde::Serialize;

/// A decision as shown in the debug overlay, unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionDebug {
    /// Slot index
    pub index: usize,
    /// Decision text
    pub text: String,
    /// Resolved target
    pub target_id: Option<String>,
}

/// One step of the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Page identifier
    pub id: String,
    /// Whether this is the page being read
    pub current: bool,
}

/// Summary line for a page in the overlay's page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePreview {
    /// Page identifier
    pub id: String,
    /// Title or fallback
    pub title: String,
    /// Type tag
    pub page_type: String,
    /// Display page number
    pub page_number: Option<String>,
}

/// Everything a debug overlay shows about a reading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct DebugSnapshot {
    /// Current page identifier
    current_page_id: String,
    /// Current page type tag
    page_type: String,
    /// Current page title or fallback
    title: String,
    /// Current page number
    page_number: Option<String>,
    /// Whether the current page is an ending
    is_ending: bool,
    /// Every decision on the current page
    decisions: Vec<DecisionDebug>,
    /// The walk so far
    history: Vec<HistoryEntry>,
    /// Whether a transition is in flight
    busy: bool,
    /// Image shown on the current page
    image_index: usize,
    /// Pages in the graph
    page_count: usize,
    /// The first few pages
    preview: Vec<PagePreview>,
}

impl DebugSnapshot {
    /// Captures the overlay data for a reader state.
    pub fn capture(
        graph: &StoryGraph,
        navigation: &NavigationState,
        busy: bool,
        config: &ReaderConfig,
    ) -> Self {
        let page = graph.page(navigation.position());

        let decisions = page
            .map(|page| {
                page.decisions()
                    .iter()
                    .enumerate()
                    .map(|(index, decision)| DecisionDebug {
                        index,
                        text: decision.text().clone(),
                        target_id: decision.target_id().clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last = navigation.history().len().saturating_sub(1);
        let history = navigation
            .history()
            .iter()
            .enumerate()
            .map(|(index, id)| HistoryEntry {
                id: id.clone(),
                current: index == last,
            })
            .collect();

        let preview = graph
            .pages()
            .take(*config.debug_preview_pages())
            .map(|page| PagePreview {
                id: page.id().clone(),
                title: page.display_title().to_string(),
                page_type: page.kind().clone(),
                page_number: page.page_number().clone(),
            })
            .collect();

        Self {
            current_page_id: navigation.position().clone(),
            page_type: page.map(|page| page.kind().clone()).unwrap_or_default(),
            title: page
                .map(|page| page.display_title().to_string())
                .unwrap_or_default(),
            page_number: page.and_then(|page| page.page_number().clone()),
            is_ending: page.is_some_and(is_ending),
            decisions,
            history,
            busy,
            image_index: *navigation.image_index(),
            page_count: graph.len(),
            preview,
        }
    }

    /// The walk as `a → b → c (current)`.
    pub fn history_line(&self) -> String {
        self.history
            .iter()
            .map(|entry| {
                if entry.current {
                    format!("{} (current)", entry.id)
                } else {
                    entry.id.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }
}
