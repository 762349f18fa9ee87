//! Untrusted story input as it arrives from the caller.
//!
//! Parsing here is deliberately forgiving: a node only has to carry an
//! identifier to survive, and every other field degrades to a default. The
//! two competing choice shapes are settled once into [`ChoiceSource`] so that
//! nothing downstream has to look at raw field names again.

use crate::lenient;
use derive_getters::Getters;
use serde::Deserialize;
use serde_json::{Map, Value};
use storyweave_error::{JsonError, StoryError, StoryErrorKind, StoryResult, StoryweaveResult};
use tracing::{debug, instrument, warn};

/// One entry of a flow-format `decisions` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RawDecision {
    /// Button label
    #[serde(default, deserialize_with = "lenient::string")]
    text: Option<String>,
    /// Embedded target, if the author wrote one
    #[serde(default, deserialize_with = "lenient::identifier")]
    target_id: Option<String>,
}

impl RawDecision {
    /// Creates a decision entry.
    pub fn new(text: impl Into<String>, target_id: Option<&str>) -> Self {
        Self {
            text: Some(text.into()),
            target_id: target_id.map(str::to_string),
        }
    }

    /// The embedded target when it is present and non-empty.
    pub fn explicit_target(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|id| !id.is_empty())
    }

    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// One entry of a direct-format `choices` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RawChoice {
    /// Button label
    #[serde(default, deserialize_with = "lenient::string")]
    text: Option<String>,
    /// Page the choice leads to
    #[serde(default, deserialize_with = "lenient::identifier")]
    next_page: Option<String>,
}

impl RawChoice {
    /// Creates a choice entry.
    pub fn new(text: impl Into<String>, next_page: Option<&str>) -> Self {
        Self {
            text: Some(text.into()),
            next_page: next_page.map(str::to_string),
        }
    }

    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Where a node's choices come from.
///
/// A node carrying both lists is read as [`ChoiceSource::Decisions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChoiceSource {
    /// Flow format: targets embedded or resolved through connections
    Decisions(Vec<RawDecision>),
    /// Direct format: every entry names its next page
    Choices(Vec<RawChoice>),
    /// Neither list was present
    #[default]
    Absent,
}

impl ChoiceSource {
    /// Number of choice slots.
    pub fn len(&self) -> usize {
        match self {
            Self::Decisions(decisions) => decisions.len(),
            Self::Choices(choices) => choices.len(),
            Self::Absent => 0,
        }
    }

    /// True when there are no choice slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An authored edge from one of a source node's choice slots to a target node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct RawConnection {
    /// Node the edge leaves from
    source_id: String,
    /// Node the edge leads to
    target_id: String,
    /// Choice slot on the source; `None` matches any untargeted slot
    source_handle: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConnection {
    #[serde(default, deserialize_with = "lenient::identifier")]
    source_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::identifier")]
    target_id: Option<String>,
    #[serde(default)]
    source_handle: Option<Value>,
}

impl RawConnection {
    /// Creates a connection.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        source_handle: Option<usize>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            source_handle,
        }
    }

    /// Whether this edge may satisfy choice slot `index` of `node_id`.
    pub fn matches(&self, node_id: &str, index: usize) -> bool {
        self.source_id == node_id && self.source_handle.is_none_or(|handle| handle == index)
    }

    fn from_value(value: Value) -> Option<Self> {
        let wire: WireConnection = serde_json::from_value(value).ok()?;
        // A handle that is present but not a slot index can never match.
        let source_handle = match wire.source_handle {
            None | Some(Value::Null) => None,
            Some(handle) => Some(usize::try_from(handle.as_u64()?).ok()?),
        };
        Some(Self {
            source_id: wire.source_id?,
            target_id: wire.target_id?,
            source_handle,
        })
    }
}

/// A story node as authored.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RawNode {
    /// Identifier, unique within a well-formed story
    id: String,
    /// Type tag (`"story"`, `"intro"`, `"goodEnding"`, ...)
    kind: Option<String>,
    /// Optional heading
    title: Option<String>,
    /// Narrative text
    content: Option<String>,
    /// Display page number
    page_number: Option<String>,
    /// Image field exactly as authored; may not even be a list
    images: Option<Value>,
    /// Resolved choice shape
    choice_source: ChoiceSource,
    /// Fields the engine does not interpret
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    #[serde(default, deserialize_with = "lenient::identifier")]
    id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    content: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    page_number: Option<String>,
    #[serde(default)]
    images: Option<Value>,
    #[serde(default, deserialize_with = "lenient::array")]
    decisions: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient::array")]
    choices: Option<Vec<Value>>,
    // Ending state is derived from the type tag, never taken from input.
    #[serde(default, rename = "isEnding")]
    _is_ending: Option<Value>,
    #[serde(default, rename = "endingType")]
    _ending_type: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawNode {
    /// Creates a node with the given identifier and nothing else.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            title: None,
            content: None,
            page_number: None,
            images: None,
            choice_source: ChoiceSource::Absent,
            extra: Map::new(),
        }
    }

    /// Sets the type tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the narrative text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the display page number.
    pub fn with_page_number(mut self, page_number: impl Into<String>) -> Self {
        self.page_number = Some(page_number.into());
        self
    }

    /// Sets the image list.
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images = images
            .into_iter()
            .map(|url| Value::String(url.into()))
            .collect();
        self.images = Some(Value::Array(images));
        self
    }

    /// Uses the flow-format decision list.
    pub fn with_decisions(mut self, decisions: Vec<RawDecision>) -> Self {
        self.choice_source = ChoiceSource::Decisions(decisions);
        self
    }

    /// Uses the direct-format choice list.
    pub fn with_choices(mut self, choices: Vec<RawChoice>) -> Self {
        self.choice_source = ChoiceSource::Choices(choices);
        self
    }

    /// Attaches an uninterpreted field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parses one node entry, or explains why it cannot be used.
    pub fn from_value(value: Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err("node entry is not an object".to_string());
        }
        let wire: WireNode =
            serde_json::from_value(value).map_err(|e| format!("unreadable node: {}", e))?;
        let id = wire
            .id
            .ok_or_else(|| "node has no identifier".to_string())?;

        let choice_source = match (wire.decisions, wire.choices) {
            (Some(decisions), _) => ChoiceSource::Decisions(
                decisions.into_iter().map(RawDecision::from_value).collect(),
            ),
            (None, Some(choices)) => {
                ChoiceSource::Choices(choices.into_iter().map(RawChoice::from_value).collect())
            }
            (None, None) => ChoiceSource::Absent,
        };

        Ok(Self {
            id,
            kind: wire.kind,
            title: wire.title,
            content: wire.content,
            page_number: wire.page_number,
            images: wire.images,
            choice_source,
            extra: wire.extra,
        })
    }
}

/// A node entry dropped while reading the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct SkippedNode {
    /// Position in the input `nodes` array
    index: usize,
    /// Why it was dropped
    reason: String,
}

impl SkippedNode {
    pub(crate) fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

/// A whole story as handed to the engine.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use storyweave_core::RawStoryData;
///
/// let raw = RawStoryData::from_value(json!({
///     "nodes": [{ "id": "start", "content": "Once upon a time" }],
///     "connections": []
/// }))
/// .expect("valid story");
///
/// assert_eq!(raw.nodes().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct RawStoryData {
    /// Nodes in authored order
    nodes: Vec<RawNode>,
    /// Edge list consulted by flow-format decisions
    connections: Vec<RawConnection>,
    /// Entries that could not be read as nodes
    skipped: Vec<SkippedNode>,
}

impl RawStoryData {
    /// Builds story data from already-typed parts.
    pub fn new(nodes: Vec<RawNode>, connections: Vec<RawConnection>) -> Self {
        Self {
            nodes,
            connections,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: Vec<SkippedNode>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Reads story data from a JSON value.
    ///
    /// # Errors
    ///
    /// Fails only when the value is not an object or has no `nodes` array.
    /// Everything below that level degrades instead of failing.
    #[instrument(skip_all)]
    pub fn from_value(value: Value) -> StoryResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(StoryError::new(StoryErrorKind::InvalidShape(
                "story data must be a JSON object".to_string(),
            )));
        };

        let Some(Value::Array(entries)) = root.remove("nodes") else {
            return Err(StoryError::new(StoryErrorKind::MissingNodes));
        };

        let connections = match root.remove("connections") {
            Some(Value::Array(items)) => {
                let total = items.len();
                let connections: Vec<RawConnection> = items
                    .into_iter()
                    .filter_map(RawConnection::from_value)
                    .collect();
                if connections.len() < total {
                    warn!(
                        dropped = total - connections.len(),
                        "Dropped unreadable connections"
                    );
                }
                connections
            }
            Some(_) => {
                warn!("connections is not an array, treating as empty");
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut nodes = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            match RawNode::from_value(entry) {
                Ok(node) => nodes.push(node),
                Err(reason) => {
                    warn!(index, reason = %reason, "Skipping unreadable node");
                    skipped.push(SkippedNode::new(index, reason));
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            connections = connections.len(),
            skipped = skipped.len(),
            "Read raw story data"
        );

        Ok(Self {
            nodes,
            connections,
            skipped,
        })
    }

    /// Parses story data from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for unparsable text and a story error for text
    /// that parses but has no `nodes` array.
    pub fn from_json_str(text: &str) -> StoryweaveResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| JsonError::new(e.to_string()))?;
        Ok(Self::from_value(value)?)
    }
}
