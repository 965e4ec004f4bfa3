//! Error taxonomy for the sunburst engine.
//!
//! Three kinds of failure exist:
//! - **DataFetch**: a topic or text document is missing or malformed. The
//!   caller keeps the last good visualization and surfaces the message.
//! - **Selection**: node data was inconsistent while handling a click. The
//!   selection controller recovers by resetting to the unselected baseline.
//! - **Configuration**: invalid settings, rejected at construction time.

use thiserror::Error;

/// Errors produced by the sunburst engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SunburstError {
    /// A topic or text document could not be fetched or parsed.
    #[error("data fetch failed for {resource}: {message}")]
    DataFetch {
        /// What was being loaded (e.g. `Data/Topics-Hosea.json`).
        resource: String,
        /// Human-readable cause.
        message: String,
    },

    /// Node data was missing or inconsistent during selection handling.
    #[error("selection failed: {0}")]
    Selection(String),

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl SunburstError {
    /// Build a `DataFetch` error from a JSON parse failure.
    pub fn malformed(resource: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::DataFetch {
            resource: resource.into(),
            message: err.to_string(),
        }
    }

    /// True for errors the caller should show to the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Selection(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SunburstError>;
