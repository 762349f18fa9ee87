//! Configuration error types.

use std::path::{Path, PathBuf};

/// Reader configuration that could not be loaded.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Configuration file involved, when there was one
    pub path: Option<PathBuf>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Names the configuration file the error is about.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyweave_error::ConfigError;
    ///
    /// let err = ConfigError::new("invalid type for `transition_delay_ms`")
    ///     .with_path("reader.toml");
    /// assert!(err.to_string().starts_with("Configuration Error in reader.toml:"));
    /// ```
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(
                f,
                "Configuration Error in {}: {} at line {} in {}",
                path.display(),
                self.message,
                self.line,
                self.file
            ),
            None => write!(
                f,
                "Configuration Error: {} at line {} in {}",
                self.message, self.line, self.file
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
