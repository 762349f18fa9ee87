//! Reader configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use storyweave_error::{ConfigError, StoryweaveResult};

/// Fade delay applied to every transition, in milliseconds.
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 300;

/// Decision text that is never rendered as a choice.
pub const DEFAULT_HIDDEN_CHOICE_TEXT: &str = "N/A";

/// Tunables for a reading session, loaded from TOML.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Examples
///
/// ```
/// use storyweave_narrative::ReaderConfig;
///
/// let config: ReaderConfig = toml::from_str("transition_delay_ms = 120").unwrap();
/// assert_eq!(*config.transition_delay_ms(), 120);
/// assert_eq!(*config.debug_preview_pages(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ReaderConfig {
    /// Delay between accepting a transition and applying it
    #[serde(default = "default_transition_delay_ms")]
    transition_delay_ms: u64,

    /// Pages listed in a debug snapshot
    #[serde(default = "default_debug_preview_pages")]
    debug_preview_pages: usize,

    /// Sentinel text filtered out of rendered choices
    #[serde(default = "default_hidden_choice_text")]
    hidden_choice_text: String,
}

fn default_transition_delay_ms() -> u64 {
    DEFAULT_TRANSITION_DELAY_MS
}

fn default_debug_preview_pages() -> usize {
    5
}

fn default_hidden_choice_text() -> String {
    DEFAULT_HIDDEN_CHOICE_TEXT.to_string()
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay_ms(),
            debug_preview_pages: default_debug_preview_pages(),
            hidden_choice_text: default_hidden_choice_text(),
        }
    }
}

impl ReaderConfig {
    /// Load reader configuration from a TOML file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryweaveResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e)).with_path(&path)
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("Failed to parse config: {}", e)).with_path(&path)
        })?;

        tracing::debug!(
            transition_delay_ms = config.transition_delay_ms,
            debug_preview_pages = config.debug_preview_pages,
            "Loaded reader config"
        );
        Ok(config)
    }

    /// Sets the transition delay.
    pub fn with_transition_delay_ms(mut self, transition_delay_ms: u64) -> Self {
        self.transition_delay_ms = transition_delay_ms;
        self
    }

    /// Sets how many pages a debug snapshot lists.
    pub fn with_debug_preview_pages(mut self, debug_preview_pages: usize) -> Self {
        self.debug_preview_pages = debug_preview_pages;
        self
    }

    /// Sets the sentinel choice text.
    pub fn with_hidden_choice_text(mut self, hidden_choice_text: impl Into<String>) -> Self {
        self.hidden_choice_text = hidden_choice_text.into();
        self
    }

    /// The transition delay as a duration.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}
