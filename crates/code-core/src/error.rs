use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading, saving or configuring a [`CodeBuffer`](crate::CodeBuffer).
pub enum CodeError {
    #[error("I/O error on {}: {source}", path.display())]
    /// Reading or writing a file failed.
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    /// The configuration document could not be parsed.
    Config(#[from] serde_yaml::Error),
}
