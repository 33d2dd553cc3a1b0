// Error types for the matching engine.
//
// Run-level problems (a topic that can't be compiled, a nonsensical band)
// abort the run. Document-level problems are recorded against the document
// and never abort the corpus pass.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for library operations.
pub type TaggerResult<T> = Result<T, TaggerError>;

#[derive(Error, Debug)]
pub enum TaggerError {
    /// The topic regex (or the alternation built from the aliases) failed to compile.
    #[error("Malformed topic pattern `{pattern}`: {source}")]
    MalformedTopicPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No usable surface forms were supplied.
    #[error("Topic has no usable surface forms: {0}")]
    EmptyTopic(String),

    /// A threshold band that can never select anything, or lies outside 0-100.
    #[error("Invalid {name} band ({lower}, {upper}]: {reason}")]
    InvalidBand {
        name: String,
        lower: f64,
        upper: f64,
        reason: String,
    },

    /// A segmented document could not be read.
    #[error("Failed to read document {}: {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
