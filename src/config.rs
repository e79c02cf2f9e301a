//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/l10n-set/l10n-set.toml`
//! 3. Local config: `<project_dir>/.l10n-set.toml`
//! 4. Environment variables: `L10N_SET_*` prefix
//! 5. Command line flags (applied by the CLI layer)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

pub const APP_NAME: &str = "l10n-set";
pub const LOCAL_CONFIG_FILE: &str = ".l10n-set.toml";
const ENV_PREFIX: &str = "L10N_SET";

/// Unified configuration for l10n-set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one YAML file per locale (default: ./translations)
    pub translations_dir: PathBuf,
    /// Extensions of locale files, without the dot (default: ["yaml"])
    pub extensions: Vec<String>,
    /// BCP 47 locale whose collation orders keys ("und" = CLDR root)
    pub sort_locale: String,
    /// Abort the batch at the first failing file
    pub fail_fast: bool,
    /// End written files with a newline
    pub trailing_newline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translations_dir: PathBuf::from("translations"),
            extensions: vec!["yaml".into()],
            sort_locale: "und".into(),
            fail_fast: false,
            trailing_newline: false,
        }
    }
}

/// Raw settings for intermediate parsing (everything optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub translations_dir: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub sort_locale: Option<String>,
    pub fail_fast: Option<bool>,
    pub trailing_newline: Option<bool>,
}

/// Get the XDG config directory for l10n-set.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["yaml"], &["yml"])          // → ["yaml", "yml"]
/// merge_array(&["yaml", "yml"], &["!yml"])  // → ["yaml"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(pattern.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

impl Settings {
    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            translations_dir: overlay
                .translations_dir
                .clone()
                .unwrap_or_else(|| self.translations_dir.clone()),
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
            sort_locale: overlay
                .sort_locale
                .clone()
                .unwrap_or_else(|| self.sort_locale.clone()),
            fail_fast: overlay.fail_fast.unwrap_or(self.fail_fast),
            trailing_newline: overlay.trailing_newline.unwrap_or(self.trailing_newline),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            ..self.merge_with(&RawSettings {
                extensions: None,
                ..global.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    ///
    /// A relative `translations_dir` is resolved against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), project_dir, None)
    }

    /// Load settings from an explicit global config file.
    ///
    /// `env` replaces the process environment as the source of `L10N_SET_*`
    /// overrides when given.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current, env)?;
        current.normalize(project_dir);

        Ok(current)
    }

    /// Apply L10N_SET_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extensions")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("translations_dir") {
            settings.translations_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
        }
        if let Ok(val) = config.get_string("sort_locale") {
            settings.sort_locale = val;
        }
        if let Ok(val) = config.get_bool("fail_fast") {
            settings.fail_fast = val;
        }
        if let Ok(val) = config.get_bool("trailing_newline") {
            settings.trailing_newline = val;
        }

        Ok(settings)
    }

    /// Expand variables in paths, anchor relative paths and clean extensions.
    pub fn normalize(&mut self, project_dir: Option<&Path>) {
        let expanded = PathBuf::from(expand_env_vars(
            self.translations_dir.to_string_lossy().as_ref(),
        ));
        self.translations_dir = match project_dir {
            Some(project) if expanded.is_relative() => project.join(expanded),
            _ => expanded,
        };

        // first occurrence wins, order is kept
        let mut seen = HashSet::new();
        self.extensions = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty() && seen.insert(e.clone()))
            .collect();
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# l10n-set configuration
#
# Locations (by precedence, lowest to highest):
#   Global:  ~/.config/l10n-set/l10n-set.toml  (defines your baseline)
#   Local:   <project>/.l10n-set.toml          (project-specific additions)
#   Env:     L10N_SET_* environment variables  (explicit overrides)
#   Flags:   --dir, --ext, --locale, --fail-fast
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     extensions = ["yml", "!yaml"]  # adds yml, removes yaml

# Directory with one YAML file per locale (relative to the project)
# translations_dir = "translations"

# Extensions of locale files
# extensions = ["yaml"]

# Locale whose alphabetical order sorts the keys ("und" = neutral root order)
# sort_locale = "und"

# Stop at the first file that fails instead of reporting it and continuing
# fail_fast = false

# End written files with a newline (default: output is trimmed)
# trailing_newline = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
