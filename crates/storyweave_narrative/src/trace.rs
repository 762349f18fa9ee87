//! Structured record of normalization decisions.
//!
//! The trace is observational: it feeds debug overlays and the `inspect`
//! command and never influences what the engine does.

use crate::start::StartRule;
use derive_getters::Getters;
use serde::Serialize;

/// How a decision's target was settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// The decision embedded its own target
    Explicit,
    /// Looked up in the connection list
    Connection {
        /// Position of the matching connection
        connection_index: usize,
    },
    /// Taken from a direct-format `nextPage`
    ChoiceNextPage,
    /// Nothing supplied a target
    Unresolved,
}

/// One normalization or selection decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// An input entry could not be read as a node
    NodeSkipped {
        /// Position in the input `nodes` array
        index: usize,
        /// Why it was dropped
        reason: String,
    },
    /// A later node reused an identifier already in the graph
    DuplicatePage {
        /// The repeated identifier
        id: String,
    },
    /// A decision slot was resolved
    DecisionResolved {
        /// Owning page
        page_id: String,
        /// Slot index
        index: usize,
        /// Decision text
        text: String,
        /// Resolved target
        target: Option<String>,
        /// Where the target came from
        source: ResolutionSource,
    },
    /// A resolved target named no page and was cleared
    DanglingTarget {
        /// Owning page
        page_id: String,
        /// Slot index
        index: usize,
        /// The missing target
        target: String,
    },
    /// A connection that supplied no decision target
    ConnectionUnused {
        /// Position in the connection list
        connection_index: usize,
        /// Declared source
        source_id: String,
        /// Declared slot
        source_handle: Option<usize>,
    },
    /// The start page was chosen
    StartSelected {
        /// Chosen page
        page_id: String,
        /// Which rule picked it
        rule: StartRule,
    },
}

/// Ordered trace of one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct NormalizationTrace {
    /// Node entries in the input
    node_count: usize,
    /// Connections in the input
    connection_count: usize,
    /// Pages in the resulting graph
    page_count: usize,
    /// Events in the order they happened
    events: Vec<TraceEvent>,
}

impl NormalizationTrace {
    pub(crate) fn new(node_count: usize, connection_count: usize) -> Self {
        Self {
            node_count,
            connection_count,
            page_count: 0,
            events: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
    }

    /// Records a start-page choice.
    pub fn record_start(&mut self, page_id: impl Into<String>, rule: StartRule) {
        self.push(TraceEvent::StartSelected {
            page_id: page_id.into(),
            rule,
        });
    }

    /// Decision events for one page, in slot order.
    pub fn decisions_for<'a>(&'a self, page_id: &'a str) -> impl Iterator<Item = &'a TraceEvent> {
        self.events.iter().filter(move |event| {
            matches!(event, TraceEvent::DecisionResolved { page_id: owner, .. } if owner == page_id)
        })
    }

    /// The most recent start selection, if one was recorded.
    pub fn start_selection(&self) -> Option<(&str, StartRule)> {
        self.events.iter().rev().find_map(|event| match event {
            TraceEvent::StartSelected { page_id, rule } => Some((page_id.as_str(), *rule)),
            _ => None,
        })
    }

    /// Number of soft inconsistencies absorbed into the graph.
    pub fn inconsistency_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    TraceEvent::NodeSkipped { .. }
                        | TraceEvent::DuplicatePage { .. }
                        | TraceEvent::DanglingTarget { .. }
                        | TraceEvent::ConnectionUnused { .. }
                        | TraceEvent::DecisionResolved {
                            source: ResolutionSource::Unresolved,
                            ..
                        }
                )
            })
            .count()
    }
}
