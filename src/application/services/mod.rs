//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Prompter)
//! but are themselves concrete structs, not traits.

mod translation;

pub use translation::{
    BatchOptions, BatchReport, FileFailure, FileLookup, FileUpdate, LookupOutcome,
    TranslationService, UpdateStatus,
};
