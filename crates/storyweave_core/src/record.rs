//! Legacy page-record input.
//!
//! Older stories were saved as an object keyed by page id, each page listing
//! `choices` with a `nextPage`. This module lifts that shape into flow form,
//! emitting one connection per resolvable choice.

use crate::lenient;
use crate::page::{BAD_ENDING, EndingType, STORY};
use crate::raw::{RawConnection, RawDecision, RawNode, RawStoryData, SkippedNode};
use indexmap::IndexSet;
use serde::Deserialize;
use serde_json::Value;
use storyweave_error::{StoryError, StoryErrorKind, StoryResult};
use tracing::{debug, instrument, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordPage {
    #[serde(default, deserialize_with = "lenient::identifier")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    content: Option<String>,
    #[serde(default, deserialize_with = "lenient::array")]
    choices: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    is_ending: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    ending_type: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RecordChoice {
    #[serde(default, deserialize_with = "lenient::string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient::identifier")]
    next_page: Option<String>,
}

impl RecordPage {
    fn type_tag(&self) -> &'static str {
        if !self.is_ending {
            return STORY;
        }
        self.ending_type
            .as_deref()
            .and_then(EndingType::from_label)
            .map_or(BAD_ENDING, |ending| ending.type_tag())
    }
}

impl RawStoryData {
    /// Converts a page record (`{ "<id>": { id, content, choices, ... } }`)
    /// into flow-form story data.
    ///
    /// Choices whose `nextPage` names a page in the record get an embedded
    /// target and a matching connection; the rest become untargeted
    /// decisions.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use storyweave_core::RawStoryData;
    ///
    /// let raw = RawStoryData::from_page_record(json!({
    ///     "start": { "id": "start", "content": "Hi", "choices": [{ "text": "On", "nextPage": "end" }] },
    ///     "end": { "id": "end", "content": "Bye", "isEnding": true, "endingType": "good" }
    /// }))
    /// .expect("record");
    ///
    /// assert_eq!(raw.nodes().len(), 2);
    /// assert_eq!(raw.connections().len(), 1);
    /// assert_eq!(raw.nodes()[1].kind().as_deref(), Some("goodEnding"));
    /// ```
    #[instrument(skip_all)]
    pub fn from_page_record(value: Value) -> StoryResult<Self> {
        let Value::Object(record) = value else {
            return Err(StoryError::new(StoryErrorKind::InvalidShape(
                "page record must be a JSON object".to_string(),
            )));
        };

        let mut pages = Vec::with_capacity(record.len());
        let mut skipped = Vec::new();
        for (index, (key, entry)) in record.into_iter().enumerate() {
            match serde_json::from_value::<RecordPage>(entry) {
                Ok(mut page) => {
                    if page.id.is_none() {
                        page.id = Some(key);
                    }
                    pages.push(page);
                }
                Err(e) => {
                    warn!(index, key = %key, error = %e, "Skipping unreadable page record");
                    skipped.push(SkippedNode::new(index, format!("unreadable page '{}'", key)));
                }
            }
        }

        let known: IndexSet<String> = pages.iter().filter_map(|page| page.id.clone()).collect();

        let mut nodes = Vec::with_capacity(pages.len());
        let mut connections = Vec::new();
        for page in pages {
            let type_tag = page.type_tag();
            let RecordPage {
                id,
                title,
                content,
                choices,
                images,
                ..
            } = page;
            let Some(id) = id else { continue };

            let mut decisions = Vec::new();
            for (index, choice) in choices.unwrap_or_default().into_iter().enumerate() {
                let choice: RecordChoice = serde_json::from_value(choice).unwrap_or_default();
                let text = choice.text.unwrap_or_default();
                match choice.next_page.filter(|next| known.contains(next)) {
                    Some(next) => {
                        connections.push(RawConnection::new(id.clone(), next.clone(), Some(index)));
                        decisions.push(RawDecision::new(text, Some(&next)));
                    }
                    None => decisions.push(RawDecision::new(text, None)),
                }
            }

            let mut node = RawNode::new(id)
                .with_kind(type_tag)
                .with_images(images)
                .with_decisions(decisions);
            if let Some(title) = title {
                node = node.with_title(title);
            }
            if let Some(content) = content {
                node = node.with_content(content);
            }
            nodes.push(node);
        }

        debug!(
            nodes = nodes.len(),
            connections = connections.len(),
            "Converted page record to flow form"
        );

        Ok(RawStoryData::new(nodes, connections).with_skipped(skipped))
    }
}
