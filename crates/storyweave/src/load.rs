//! Reading story files from disk.

use serde_json::Value;
use std::path::Path;
use storyweave_core::RawStoryData;
use storyweave_error::{JsonError, StoryError, StoryErrorKind, StoryweaveResult};

/// Shape a story file was saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoryFormat {
    /// `{ nodes, connections }`
    #[default]
    Flow,
    /// `{ "<id>": page, ... }`
    PageRecord,
}

impl StoryFormat {
    /// Format selected by the `--page-record` flag.
    pub fn from_page_record_flag(page_record: bool) -> Self {
        if page_record {
            Self::PageRecord
        } else {
            Self::Flow
        }
    }
}

/// Parses story text in the given format.
///
/// # Errors
///
/// Returns a JSON error for unparsable text and a story error when the
/// parsed value does not have the expected top-level shape.
pub fn parse_story(text: &str, format: StoryFormat) -> StoryweaveResult<RawStoryData> {
    let value: Value = serde_json::from_str(text).map_err(|e| JsonError::new(e.to_string()))?;
    let raw = match format {
        StoryFormat::Flow => RawStoryData::from_value(value)?,
        StoryFormat::PageRecord => RawStoryData::from_page_record(value)?,
    };
    Ok(raw)
}

/// Reads and parses a story file.
///
/// # Errors
///
/// As [`parse_story`], plus [`StoryErrorKind::Unreadable`] when the file
/// cannot be read.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_story(path: impl AsRef<Path>, format: StoryFormat) -> StoryweaveResult<RawStoryData> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        StoryError::new(StoryErrorKind::Unreadable(format!(
            "{}: {}",
            path.as_ref().display(),
            e
        )))
    })?;
    let raw = parse_story(&text, format)?;
    tracing::info!(
        nodes = raw.nodes().len(),
        connections = raw.connections().len(),
        "Loaded story file"
    );
    Ok(raw)
}
