//! The canonical story graph.

use crate::normalizer::normalize;
use crate::start::{StartSelection, select_start};
use crate::trace::NormalizationTrace;
use indexmap::IndexMap;
use serde::Serialize;
use storyweave_core::{Page, RawStoryData};
use storyweave_error::{StoryError, StoryErrorKind, StoryResult};

/// Pages keyed by identifier, in authored order.
///
/// A graph is never empty and never changes after construction, so it can
/// be shared between a reader and any number of observers without locking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StoryGraph {
    pages: IndexMap<String, Page>,
}

impl StoryGraph {
    /// Normalizes raw story data into a graph.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::EmptyGraph`] when no page survives
    /// normalization.
    pub fn from_raw(raw: &RawStoryData) -> StoryResult<(Self, NormalizationTrace)> {
        let (pages, trace) = normalize(raw).into_parts();
        Ok((Self::from_pages(pages)?, trace))
    }

    /// Wraps an already-normalized page map.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::EmptyGraph`] for an empty map.
    pub fn from_pages(pages: IndexMap<String, Page>) -> StoryResult<Self> {
        if pages.is_empty() {
            return Err(StoryError::new(StoryErrorKind::EmptyGraph));
        }
        Ok(Self { pages })
    }

    /// Builds a graph from pages, keyed by their identifiers.
    ///
    /// A later page with a repeated identifier replaces the earlier one.
    pub fn from_page_list(pages: impl IntoIterator<Item = Page>) -> StoryResult<Self> {
        Self::from_pages(
            pages
                .into_iter()
                .map(|page| (page.id().clone(), page))
                .collect(),
        )
    }

    /// Looks up a page.
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    /// Whether a page with this identifier exists.
    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    /// Pages in authored order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// The underlying page map.
    pub fn page_map(&self) -> &IndexMap<String, Page> {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false for a constructed graph.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Selects the start page against the current page set.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::NoStartPage`] if selection finds nothing.
    pub fn start(&self) -> StoryResult<StartSelection<'_>> {
        select_start(&self.pages).ok_or_else(|| StoryError::new(StoryErrorKind::NoStartPage))
    }
}
