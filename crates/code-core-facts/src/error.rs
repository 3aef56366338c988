use thiserror::Error;

/// Errors returned by queries that need the type header.
///
/// Lookups by member name never fail; an unknown name yields an empty result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    /// No class or interface header could be matched in the text.
    #[error("malformed source: {reason}")]
    MalformedSource {
        /// What could not be recognized.
        reason: String,
    },
}
