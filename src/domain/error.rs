//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the document tree rules.
/// These are independent of file formats and I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("key path is empty")]
    EmptyKeyPath,

    #[error("key path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    #[error("the key you want to update has children: {path}")]
    KeyHasChildren { path: String },

    #[error("document root is not a mapping")]
    RootNotMapping,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
