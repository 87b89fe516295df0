//! Error types for the oa-autoreplace crate.

use std::path::PathBuf;

use crate::rule::matcher::Side;

/// Auto-replace error types.
///
/// Everything except [`ReplaceError::Transform`] is a configuration error,
/// raised once when a rule is built or a rule file is loaded. A rule that
/// simply does not apply to an event is not an error.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    /// The rule has no transform callback.
    #[error("you must provide a `transform` option")]
    MissingTransform,

    /// The rule has no trigger.
    #[error("you must provide a `trigger` option")]
    MissingTrigger,

    /// A before/after pattern declares more than one capturing group.
    #[error("`{side}` pattern has {count} capture groups, at most one is allowed")]
    TooManyCaptureGroups { side: Side, count: usize },

    /// A pattern in a rule file failed to compile.
    #[error("invalid `{field}` pattern `{pattern}`: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Rule file JSON did not match the expected shape.
    #[error("invalid rule configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error with context.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document was constructed with a cursor outside its blocks.
    #[error("cursor block {block} out of range ({len} blocks)")]
    InvalidSelection { block: usize, len: usize },

    /// The caller-supplied transform callback failed. Nothing was applied.
    #[error("transform callback failed: {0}")]
    Transform(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Convenience result type for oa-autoreplace operations.
pub type ReplaceResult<T> = Result<T, ReplaceError>;
