//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support (project adds extensions)
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Every test passes its own global config path and an empty environment, so
//! the user's real config and `L10N_SET_*` variables never leak in.

use std::fs;
use std::path::Path;

use config::Map;
use tempfile::TempDir;

use l10n_set::application::ApplicationError;
use l10n_set::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};

/// Load with no global config and an empty environment.
fn load_isolated(project: &Path) -> Result<Settings, ApplicationError> {
    Settings::load_from(None, Some(project), Some(Map::new()))
}

#[test]
fn given_local_config_with_extensions_when_load_then_unions_with_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        "extensions = [\"yml\"]\n",
    )
    .unwrap();

    // Act
    let settings = load_isolated(project.path()).expect("load settings");

    // Assert
    assert_eq!(settings.extensions, vec!["yaml", "yml"]);
}

#[test]
fn given_local_config_with_negation_when_load_then_removes_default() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        "extensions = [\"yml\", \"!yaml\"]\n",
    )
    .unwrap();

    // Act
    let settings = load_isolated(project.path()).expect("load settings");

    // Assert
    assert_eq!(settings.extensions, vec!["yml"]);
}

#[test]
fn given_local_config_with_scalars_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        r#"
translations_dir = "locales"
sort_locale = "sv"
fail_fast = true
trailing_newline = true
"#,
    )
    .unwrap();

    // Act
    let settings = load_isolated(project.path()).expect("load settings");

    // Assert
    assert_eq!(settings.translations_dir, project.path().join("locales"));
    assert_eq!(settings.sort_locale, "sv");
    assert!(settings.fail_fast);
    assert!(settings.trailing_newline);
}

#[test]
fn given_no_local_config_when_load_then_translations_dir_is_under_project() {
    let project = TempDir::new().unwrap();

    let settings = load_isolated(project.path()).expect("load settings");

    assert_eq!(
        settings.translations_dir,
        project.path().join("translations")
    );
    assert_eq!(settings.sort_locale, "und");
}

#[test]
fn given_absolute_translations_dir_when_load_then_keeps_it() {
    let project = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        format!("translations_dir = {:?}\n", elsewhere.path().display().to_string()),
    )
    .unwrap();

    let settings = load_isolated(project.path()).expect("load settings");

    assert_eq!(settings.translations_dir, elsewhere.path());
}

#[test]
fn given_malformed_local_config_when_load_then_fails_with_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "fail_fast = maybe\n").unwrap();

    let err = load_isolated(project.path()).unwrap_err();

    assert!(err.to_string().starts_with("config error:"), "{err}");
}

#[test]
fn given_global_and_local_config_when_load_then_global_replaces_and_local_unions() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("l10n-set.toml");
    fs::write(&global, "extensions = [\"yml\"]\nsort_locale = \"de\"\n").unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(LOCAL_CONFIG_FILE),
        "extensions = [\"json\"]\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(Some(&global), Some(project.path()), Some(Map::new()))
        .expect("load settings");

    // Assert
    assert_eq!(settings.extensions, vec!["json", "yml"]);
    assert_eq!(settings.sort_locale, "de");
}

#[test]
fn given_env_override_when_load_then_beats_local_config() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(LOCAL_CONFIG_FILE), "fail_fast = false\n").unwrap();
    let mut env = Map::new();
    env.insert("L10N_SET_FAIL_FAST".to_string(), "true".to_string());

    let settings =
        Settings::load_from(None, Some(project.path()), Some(env)).expect("load settings");

    assert!(settings.fail_fast);
}

#[test]
fn given_template_when_parsed_then_is_valid_toml_for_settings() {
    let template = Settings::template();

    let parsed: Settings = toml::from_str(&template).expect("template parses");

    assert_eq!(parsed, Settings::default());
}
