//! Graph normalization.
//!
//! Turns [`RawStoryData`] into canonical pages. Normalization is total: bad
//! substructures are absorbed into the output (a null target, an empty image
//! list) and noted in the [`NormalizationTrace`], never raised.

use crate::trace::{NormalizationTrace, ResolutionSource, TraceEvent};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use storyweave_core::{
    ChoiceSource, Decision, EndingType, Page, RawConnection, RawNode, RawStoryData, STORY,
};
use tracing::{debug, info, instrument, warn};

/// Output of [`normalize`]: the page map plus the decisions that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStory {
    pages: IndexMap<String, Page>,
    trace: NormalizationTrace,
}

impl NormalizedStory {
    /// Canonical pages in authored order.
    pub fn pages(&self) -> &IndexMap<String, Page> {
        &self.pages
    }

    /// The normalization trace.
    pub fn trace(&self) -> &NormalizationTrace {
        &self.trace
    }

    /// Splits into pages and trace.
    pub fn into_parts(self) -> (IndexMap<String, Page>, NormalizationTrace) {
        (self.pages, self.trace)
    }
}

/// Normalizes raw story data into canonical pages.
///
/// Pure and deterministic: the same input always yields the same pages in
/// the same order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use storyweave_core::RawStoryData;
/// use storyweave_narrative::normalize;
///
/// let raw = RawStoryData::from_value(json!({
///     "nodes": [
///         { "id": "a", "content": "Start", "decisions": [{ "text": "Go" }] },
///         { "id": "b", "content": "End", "type": "goodEnding" }
///     ],
///     "connections": [{ "sourceId": "a", "targetId": "b", "sourceHandle": 0 }]
/// }))
/// .unwrap();
///
/// let story = normalize(&raw);
/// let a = &story.pages()["a"];
/// assert_eq!(a.decisions()[0].target_id().as_deref(), Some("b"));
/// assert!(*story.pages()["b"].is_ending());
/// ```
#[instrument(skip_all, fields(nodes = raw.nodes().len(), connections = raw.connections().len()))]
pub fn normalize(raw: &RawStoryData) -> NormalizedStory {
    let mut trace = NormalizationTrace::new(
        raw.nodes().len() + raw.skipped().len(),
        raw.connections().len(),
    );

    for skipped in raw.skipped() {
        trace.push(TraceEvent::NodeSkipped {
            index: *skipped.index(),
            reason: skipped.reason().clone(),
        });
    }

    let mut pages: IndexMap<String, Page> = IndexMap::with_capacity(raw.nodes().len());
    let mut used_connections = HashSet::new();
    for node in raw.nodes() {
        let page = build_page(node, raw.connections(), &mut used_connections, &mut trace);
        if pages.insert(page.id().clone(), page).is_some() {
            warn!(id = %node.id(), "Duplicate page identifier, later node wins");
            trace.push(TraceEvent::DuplicatePage {
                id: node.id().clone(),
            });
        }
    }

    clear_dangling_targets(&mut pages, &mut trace);
    note_unused_connections(raw.connections(), &used_connections, &mut trace);

    trace.set_page_count(pages.len());
    info!(
        pages = pages.len(),
        connections = raw.connections().len(),
        inconsistencies = trace.inconsistency_count(),
        "Normalized story graph"
    );

    NormalizedStory { pages, trace }
}

fn build_page(
    node: &RawNode,
    connections: &[RawConnection],
    used_connections: &mut HashSet<usize>,
    trace: &mut NormalizationTrace,
) -> Page {
    let kind = node.kind().clone().unwrap_or_else(|| STORY.to_string());
    let ending_type = EndingType::from_type_tag(&kind);
    let decisions = resolve_decisions(node, connections, used_connections, trace);
    let images = coerce_images(node.images().as_ref());

    Page::new(node.id().clone(), node.content().clone().unwrap_or_default())
        .with_kind(kind)
        .with_title(node.title().clone())
        .with_page_number(node.page_number().clone())
        .with_decisions(decisions)
        .with_images(images)
        .with_ending(ending_type)
        .with_extra(node.extra().clone())
}

fn resolve_decisions(
    node: &RawNode,
    connections: &[RawConnection],
    used_connections: &mut HashSet<usize>,
    trace: &mut NormalizationTrace,
) -> Vec<Decision> {
    let resolved: Vec<(String, Option<String>, ResolutionSource)> = match node.choice_source() {
        ChoiceSource::Decisions(decisions) => decisions
            .iter()
            .enumerate()
            .map(|(index, decision)| {
                let text = decision.text().clone().unwrap_or_default();
                if let Some(target) = decision.explicit_target() {
                    return (text, Some(target.to_string()), ResolutionSource::Explicit);
                }
                match connections
                    .iter()
                    .enumerate()
                    .find(|(_, connection)| connection.matches(node.id(), index))
                {
                    Some((connection_index, connection))
                        if !connection.target_id().is_empty() =>
                    {
                        used_connections.insert(connection_index);
                        (
                            text,
                            Some(connection.target_id().clone()),
                            ResolutionSource::Connection { connection_index },
                        )
                    }
                    _ => (text, None, ResolutionSource::Unresolved),
                }
            })
            .collect(),
        ChoiceSource::Choices(choices) => choices
            .iter()
            .map(|choice| {
                let text = choice.text().clone().unwrap_or_default();
                match choice.next_page().as_deref().filter(|next| !next.is_empty()) {
                    Some(next) => (text, Some(next.to_string()), ResolutionSource::ChoiceNextPage),
                    None => (text, None, ResolutionSource::Unresolved),
                }
            })
            .collect(),
        ChoiceSource::Absent => Vec::new(),
    };

    resolved
        .into_iter()
        .enumerate()
        .map(|(index, (text, target, source))| {
            debug!(
                page = %node.id(),
                index,
                text = %text,
                target = target.as_deref().unwrap_or("null"),
                ?source,
                "Resolved decision"
            );
            trace.push(TraceEvent::DecisionResolved {
                page_id: node.id().clone(),
                index,
                text: text.clone(),
                target: target.clone(),
                source,
            });
            Decision::new(text, target)
        })
        .collect()
}

fn coerce_images(images: Option<&Value>) -> Vec<String> {
    match images {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn clear_dangling_targets(pages: &mut IndexMap<String, Page>, trace: &mut NormalizationTrace) {
    let ids: HashSet<String> = pages.keys().cloned().collect();
    for page in pages.values_mut() {
        for (index, target) in page.clear_dangling_targets(|target| ids.contains(target)) {
            warn!(page = %page.id(), index, target = %target, "Decision targets a missing page");
            trace.push(TraceEvent::DanglingTarget {
                page_id: page.id().clone(),
                index,
                target,
            });
        }
    }
}

/// Traces every connection that supplied no decision target: out-of-range
/// handles, sources without decision slots, slots already filled explicitly,
/// and connections shadowed by an earlier match.
fn note_unused_connections(
    connections: &[RawConnection],
    used_connections: &HashSet<usize>,
    trace: &mut NormalizationTrace,
) {
    for (connection_index, connection) in connections.iter().enumerate() {
        if used_connections.contains(&connection_index) {
            continue;
        }
        debug!(
            connection_index,
            source = %connection.source_id(),
            handle = ?connection.source_handle(),
            "Connection supplied no decision target"
        );
        trace.push(TraceEvent::ConnectionUnused {
            connection_index,
            source_id: connection.source_id().clone(),
            source_handle: *connection.source_handle(),
        });
    }
}
