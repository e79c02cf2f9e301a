//! YAML codec for locale files.
//!
//! The reader builds a [`Document`] from YAML text; the writer renders it back
//! with two-space indentation and no line wrapping. Parsed scalars, flow
//! collections and comments keep their source form. Values added by an edit
//! are single-quoted, and added keys are plain where legal.

mod reader;
mod schema;
mod source;
mod writer;

pub use reader::parse_document;
pub use writer::render_document;

use crate::domain::Mapping;

/// Root mapping of a locale file with the comment lines around it.
///
/// `""` in `header` or `footer` stands for a blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Comments at the top of the file
    pub header: Vec<String>,
    pub root: Mapping,
    /// Comments after the last entry
    pub footer: Vec<String>,
}

impl From<Mapping> for Document {
    fn from(root: Mapping) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }
}
