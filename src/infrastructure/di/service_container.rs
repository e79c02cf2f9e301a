//! Service container for dependency injection
//!
//! Wires up the translation service with its dependencies.

use std::sync::Arc;

use crate::application::services::{BatchOptions, TranslationService};
use crate::application::LocaleCollator;
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{FileSystem, Prompter, RealFileSystem, StdinPrompter};

/// Container holding settings and the I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive input
    pub prompter: Arc<dyn Prompter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(StdinPrompter))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            prompter,
        }
    }

    /// Build a translation service ordered by the configured sort locale.
    pub fn translation_service(&self) -> InfraResult<TranslationService> {
        let collator = LocaleCollator::new(&self.settings.sort_locale)?;
        Ok(TranslationService::new(
            Arc::clone(&self.fs),
            Box::new(collator),
            BatchOptions::from(self.settings.as_ref()),
        ))
    }

    /// Ask the user a question through the configured prompter.
    pub fn ask(&self, question: &str) -> InfraResult<String> {
        self.prompter.ask(question).map_err(|source| InfraError::Input {
            prompt: question.trim_end().to_string(),
            source,
        })
    }
}
