//! Domain layer: document tree, key paths and key ordering
//!
//! This layer is independent of external concerns (no I/O, no YAML, no config loading).

pub mod error;
pub mod key_path;
pub mod order;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use key_path::KeyPath;
pub use order::{CodePointOrder, KeyOrder};
pub use tree::{CollectionStyle, EntryLayout, Mapping, Node, Scalar, ScalarStyle, Sequence};
