//! Application layer: YAML codec, key collation and the translation service
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod collation;
pub mod error;
pub mod error_ext;
pub mod services;
pub mod yaml;

pub use collation::LocaleCollator;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
