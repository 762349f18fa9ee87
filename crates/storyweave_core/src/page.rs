//! Canonical page types produced by normalization.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default type tag for ordinary pages.
pub const STORY: &str = "story";
/// Type tag marking an introduction page.
pub const INTRO: &str = "intro";
/// Type tag for a bad ending.
pub const BAD_ENDING: &str = "badEnding";
/// Type tag for a good ending.
pub const GOOD_ENDING: &str = "goodEnding";
/// Type tag for the best ending.
pub const BEST_ENDING: &str = "bestEnding";

/// Classification of a terminal page.
///
/// # Examples
///
/// ```
/// use storyweave_core::EndingType;
///
/// assert_eq!(EndingType::from_type_tag("goodEnding"), Some(EndingType::Good));
/// assert_eq!(EndingType::from_type_tag("story"), None);
/// assert_eq!(EndingType::Best.type_tag(), "bestEnding");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    /// A bad ending
    #[display("bad")]
    Bad,
    /// A good ending
    #[display("good")]
    Good,
    /// The best ending
    #[display("best")]
    Best,
}

impl EndingType {
    /// Maps a page type tag to its ending type, if it is one of the ending tags.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            BAD_ENDING => Some(Self::Bad),
            GOOD_ENDING => Some(Self::Good),
            BEST_ENDING => Some(Self::Best),
            _ => None,
        }
    }

    /// Maps a short ending label (`"bad"`, `"good"`, `"best"`) to its type.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "bad" => Some(Self::Bad),
            "good" => Some(Self::Good),
            "best" => Some(Self::Best),
            _ => None,
        }
    }

    /// The page type tag carried by pages of this ending type.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Bad => BAD_ENDING,
            Self::Good => GOOD_ENDING,
            Self::Best => BEST_ENDING,
        }
    }
}

/// A labeled option on a page.
///
/// `target_id` is either the identifier of a page in the same graph or `None`
/// for a dead-end choice that renders disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Button label
    text: String,
    /// Page this choice leads to
    target_id: Option<String>,
}

impl Decision {
    /// Creates a decision.
    pub fn new(text: impl Into<String>, target_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            target_id,
        }
    }

    /// Whether the choice leads anywhere.
    pub fn is_enabled(&self) -> bool {
        self.target_id.is_some()
    }

    pub(crate) fn clear_target(&mut self) -> Option<String> {
        self.target_id.take()
    }
}

/// One screen of narrative content after normalization.
///
/// Pages are immutable once a graph has been built; navigation only moves a
/// pointer between them.
///
/// # Examples
///
/// ```
/// use storyweave_core::{Decision, PageBuilder};
///
/// let page = PageBuilder::default()
///     .id("cave")
///     .content("It is dark.")
///     .decisions(vec![Decision::new("Light a torch", Some("torch".to_string()))])
///     .build()
///     .expect("page");
///
/// assert_eq!(page.kind(), "story");
/// assert!(!*page.is_ending());
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Page {
    /// Unique identifier within the graph
    id: String,
    /// Type tag, `"story"` unless the author said otherwise
    #[serde(rename = "type")]
    #[builder(default = "STORY.to_string()")]
    kind: String,
    /// Optional heading
    #[builder(default, setter(into, strip_option))]
    title: Option<String>,
    /// Narrative text; empty when the author left it out
    #[builder(default)]
    content: String,
    /// Choices in display order
    #[builder(default)]
    decisions: Vec<Decision>,
    /// Attached image URLs
    #[builder(default)]
    images: Vec<String>,
    /// Display page number
    #[builder(default, setter(into, strip_option))]
    page_number: Option<String>,
    /// Terminal page marker
    #[builder(default)]
    is_ending: bool,
    /// Which ending this page is, when it is one
    #[builder(default, setter(into, strip_option))]
    ending_type: Option<EndingType>,
    /// Author fields the engine does not interpret (editor position and the like)
    #[serde(flatten)]
    #[builder(default)]
    extra: Map<String, Value>,
}

impl Page {
    /// Creates a plain story page with the given identifier and text.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: STORY.to_string(),
            title: None,
            content: content.into(),
            decisions: Vec::new(),
            images: Vec::new(),
            page_number: None,
            is_ending: false,
            ending_type: None,
            extra: Map::new(),
        }
    }

    /// Sets the type tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets or clears the title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Sets or clears the display page number.
    pub fn with_page_number(mut self, page_number: Option<String>) -> Self {
        self.page_number = page_number;
        self
    }

    /// Replaces the decision list.
    pub fn with_decisions(mut self, decisions: Vec<Decision>) -> Self {
        self.decisions = decisions;
        self
    }

    /// Replaces the image list.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Marks the page as an ending of the given type, or as no ending at all.
    pub fn with_ending(mut self, ending_type: Option<EndingType>) -> Self {
        self.is_ending = ending_type.is_some();
        self.ending_type = ending_type;
        self
    }

    /// Replaces the uninterpreted author fields.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Number of attached images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Title or a fallback label for display.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Nulls every decision target that fails `exists`, returning the
    /// `(index, target)` pairs that were cleared.
    pub fn clear_dangling_targets<F>(&mut self, exists: F) -> Vec<(usize, String)>
    where
        F: Fn(&str) -> bool,
    {
        let mut cleared = Vec::new();
        for (index, decision) in self.decisions.iter_mut().enumerate() {
            let dangling = decision
                .target_id
                .as_deref()
                .is_some_and(|target| !exists(target));
            if !dangling {
                continue;
            }
            if let Some(target) = decision.clear_target() {
                cleared.push((index, target));
            }
        }
        cleared
    }
}
