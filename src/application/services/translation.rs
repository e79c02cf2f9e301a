//! Translation service
//!
//! Applies one key path/value pair to every locale file in a directory.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::yaml::{parse_document, render_document, Document};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{KeyOrder, KeyPath, Node, Scalar};
use crate::infrastructure::traits::FileSystem;

/// Batch behavior taken from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// File extensions (without dot) that mark locale files
    pub extensions: Vec<String>,
    /// Stop after the first failing file
    pub fail_fast: bool,
    /// End written files with a newline
    pub trailing_newline: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["yaml".into()],
            fail_fast: false,
            trailing_newline: false,
        }
    }
}

impl From<&Settings> for BatchOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            extensions: settings.extensions.clone(),
            fail_fast: settings.fail_fast,
            trailing_newline: settings.trailing_newline,
        }
    }
}

/// What happened at the key path in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Key did not exist before
    Added,
    /// Key held a different value (or an empty mapping)
    Replaced,
    /// Key already held this value
    Unchanged,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateStatus::Added => "added",
            UpdateStatus::Replaced => "replaced",
            UpdateStatus::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// One successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub status: UpdateStatus,
    /// False when the rendered text equals the file content
    pub written: bool,
}

/// One file that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ApplicationError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub updated: Vec<FileUpdate>,
    pub failed: Vec<FileFailure>,
    /// Files not attempted because an earlier one failed with fail-fast on
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.updated.len() + self.failed.len() + self.skipped.len()
    }
}

/// Value found at a key path in one file.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Scalar),
    /// Path exists but holds a mapping or sequence
    NotALeaf,
    Missing,
    Failed(ApplicationError),
}

#[derive(Debug)]
pub struct FileLookup {
    pub path: PathBuf,
    pub outcome: LookupOutcome,
}

/// Service that edits locale files.
pub struct TranslationService {
    fs: Arc<dyn FileSystem>,
    order: Box<dyn KeyOrder>,
    options: BatchOptions,
}

impl TranslationService {
    /// Create a new translation service.
    pub fn new(fs: Arc<dyn FileSystem>, order: Box<dyn KeyOrder>, options: BatchOptions) -> Self {
        Self { fs, order, options }
    }

    /// Locale files directly inside `dir`, sorted by file name.
    ///
    /// # Errors
    /// [`ApplicationError::DirectoryRead`] if `dir` is missing, not a
    /// directory or cannot be listed.
    pub fn discover(&self, dir: &Path) -> ApplicationResult<Vec<PathBuf>> {
        if !self.fs.exists(dir) {
            return Err(directory_error(dir, io::ErrorKind::NotFound, "no such directory"));
        }
        if !self.fs.is_dir(dir) {
            return Err(directory_error(dir, io::ErrorKind::InvalidInput, "not a directory"));
        }

        let entries = self
            .fs
            .read_dir(dir)
            .map_err(|source| ApplicationError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })?;
        let mut files: Vec<PathBuf> = entries
            .into_iter()
            .filter(|path| self.has_locale_extension(path) && self.fs.is_file(path))
            .collect();
        files.sort();

        debug!("discover: {} locale files in {}", files.len(), dir.display());
        Ok(files)
    }

    fn has_locale_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.options.extensions.iter().any(|e| e == ext))
    }

    /// Apply `value` at `key_path` to YAML text and return the new text.
    ///
    /// The text is parsed, updated, sorted at every level, rendered and
    /// stripped of trailing whitespace. Comments and the style of existing
    /// values are kept.
    pub fn apply(&self, content: &str, key_path: &KeyPath, value: &str) -> ApplicationResult<(String, UpdateStatus)> {
        let mut doc = parse_document(content)?;
        let previous = doc.root.insert(key_path, value)?;
        doc.root.sort(self.order.as_ref());

        let status = match previous {
            None => UpdateStatus::Added,
            Some(Node::Scalar(Scalar::Str(old, _))) if old == value => UpdateStatus::Unchanged,
            Some(_) => UpdateStatus::Replaced,
        };

        Ok((self.finish_text(&doc), status))
    }

    fn finish_text(&self, doc: &Document) -> String {
        let rendered = render_document(doc);
        let mut text = rendered.trim_end().to_string();
        if self.options.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// Update one file in place.
    #[instrument(skip(self, value))]
    pub fn update_file(&self, file: &Path, key_path: &KeyPath, value: &str) -> ApplicationResult<FileUpdate> {
        let content = self
            .fs
            .read_to_string(file)
            .with_path_context("read locale file", file)?;

        let (text, status) = self.apply(&content, key_path, value)?;

        let written = text != content;
        if written {
            self.fs
                .write(file, &text)
                .with_path_context("write locale file", file)?;
            info!("File updated and saved: {}", file.display());
        } else {
            debug!("content unchanged: {}", file.display());
        }

        Ok(FileUpdate {
            path: file.to_path_buf(),
            status,
            written,
        })
    }

    /// Update every locale file in `dir`.
    ///
    /// A failing file is recorded and the remaining files are still
    /// processed, unless fail-fast is set. Only a directory that cannot be
    /// listed fails the whole call.
    #[instrument(skip(self, value))]
    pub fn update_all(&self, dir: &Path, key_path: &KeyPath, value: &str) -> ApplicationResult<BatchReport> {
        let files = self.discover(dir)?;
        let mut report = BatchReport::default();

        let mut remaining = files.into_iter();
        for file in remaining.by_ref() {
            match self.update_file(&file, key_path, value) {
                Ok(update) => report.updated.push(update),
                Err(error) => {
                    warn!("{}: {}", file.display(), error);
                    report.failed.push(FileFailure { path: file, error });
                    if self.options.fail_fast {
                        break;
                    }
                }
            }
        }
        report.skipped.extend(remaining);

        Ok(report)
    }

    /// Read the value at `key_path` from every locale file in `dir`.
    pub fn lookup_all(&self, dir: &Path, key_path: &KeyPath) -> ApplicationResult<Vec<FileLookup>> {
        let files = self.discover(dir)?;

        Ok(files
            .into_iter()
            .map(|path| {
                let outcome = match self.lookup_file(&path, key_path) {
                    Ok(Some(Node::Scalar(scalar))) => LookupOutcome::Found(scalar),
                    Ok(Some(_)) => LookupOutcome::NotALeaf,
                    Ok(None) => LookupOutcome::Missing,
                    Err(error) => LookupOutcome::Failed(error),
                };
                FileLookup { path, outcome }
            })
            .collect())
    }

    fn lookup_file(&self, file: &Path, key_path: &KeyPath) -> ApplicationResult<Option<Node>> {
        let content = self
            .fs
            .read_to_string(file)
            .with_path_context("read locale file", file)?;
        let doc = parse_document(&content)?;
        Ok(doc.root.lookup(key_path).cloned())
    }
}

fn directory_error(dir: &Path, kind: io::ErrorKind, message: &str) -> ApplicationError {
    ApplicationError::DirectoryRead {
        path: dir.to_path_buf(),
        source: io::Error::new(kind, message.to_string()),
    }
}
