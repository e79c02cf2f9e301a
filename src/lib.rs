//! Add or update one localization string across per-locale YAML files.
//!
//! Layers, innermost first: [`domain`] (key paths, document tree, key
//! ordering), [`application`] (YAML codec, collation, translation service),
//! [`infrastructure`] (I/O boundaries, service wiring) and [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
