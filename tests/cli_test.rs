//! Tests for the set/get command handlers with a scripted prompter

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use l10n_set::cli::commands::{cmd_get, cmd_set, PATH_PROMPT, VALUE_PROMPT};
use l10n_set::cli::CliError;
use l10n_set::config::Settings;
use l10n_set::exitcode;
use l10n_set::infrastructure::di::ServiceContainer;
use l10n_set::infrastructure::traits::{Prompter, RealFileSystem};
use l10n_set::util::testing;

/// Prompter that replays canned answers and records the questions asked.
#[derive(Default)]
struct MockPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl MockPrompter {
    fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Mutex::default(),
        }
    }

    fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for MockPrompter {
    fn ask(&self, question: &str) -> io::Result<String> {
        self.asked.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed"))
    }
}

struct Fixture {
    _temp: TempDir,
    dir: PathBuf,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        testing::init_test_setup();
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("translations");
        fs::create_dir(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        Self { _temp: temp, dir }
    }

    fn container(&self, prompter: Arc<MockPrompter>) -> ServiceContainer {
        let settings = Settings {
            translations_dir: self.dir.clone(),
            ..Settings::default()
        };
        ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), prompter)
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.join(name)).unwrap()
    }
}

#[test]
fn given_no_arguments_when_setting_then_prompts_for_path_and_value() {
    // Arrange
    let fixture = Fixture::new(&[("en.yaml", "b: 'B'\n")]);
    let prompter = Arc::new(MockPrompter::with_answers(&["  a.title \n", "Hello world"]));
    let container = fixture.container(Arc::clone(&prompter));

    // Act
    cmd_set(&container, None, None).unwrap();

    // Assert
    assert_eq!(prompter.asked(), vec![PATH_PROMPT, VALUE_PROMPT]);
    assert_eq!(fixture.read("en.yaml"), "a:\n  title: 'Hello world'\nb: 'B'");
}

#[test]
fn given_arguments_when_setting_then_does_not_prompt() {
    let fixture = Fixture::new(&[("en.yaml", "")]);
    let prompter = Arc::new(MockPrompter::default());
    let container = fixture.container(Arc::clone(&prompter));

    cmd_set(&container, Some("x.y"), Some("it's")).unwrap();

    assert!(prompter.asked().is_empty());
    assert_eq!(fixture.read("en.yaml"), "x:\n  y: 'it''s'");
}

#[test]
fn given_closed_input_when_prompting_then_fails_with_noinput() {
    let fixture = Fixture::new(&[("en.yaml", "a: 'x'\n")]);
    let container = fixture.container(Arc::new(MockPrompter::default()));

    let err = cmd_set(&container, None, None).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
    assert_eq!(fixture.read("en.yaml"), "a: 'x'\n");
}

#[test]
fn given_path_with_empty_segment_when_setting_then_fails_before_touching_files() {
    let fixture = Fixture::new(&[("en.yaml", "a: 'x'\n")]);
    let prompter = Arc::new(MockPrompter::default());
    let container = fixture.container(Arc::clone(&prompter));

    let err = cmd_set(&container, Some("a..b"), None).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert!(prompter.asked().is_empty(), "value must not be asked for");
    assert_eq!(fixture.read("en.yaml"), "a: 'x'\n");
}

#[test]
fn given_conflicting_file_when_setting_then_reports_batch_failure() {
    let fixture = Fixture::new(&[
        ("de.yaml", "a:\n  b: 'x'\n"),
        ("en.yaml", "a: 'x'\n"),
    ]);
    let container = fixture.container(Arc::new(MockPrompter::default()));

    let err = cmd_set(&container, Some("a"), Some("y")).unwrap_err();

    assert!(matches!(err, CliError::BatchFailed { failed: 1, total: 2 }));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(fixture.read("en.yaml"), "a: 'y'");
}

#[test]
fn given_unknown_sort_locale_when_setting_then_fails_with_config_code() {
    let fixture = Fixture::new(&[("en.yaml", "")]);
    let settings = Settings {
        translations_dir: fixture.dir.clone(),
        sort_locale: "not a locale!".into(),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(MockPrompter::default()),
    );

    let err = cmd_set(&container, Some("a"), Some("b")).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[test]
fn given_values_when_getting_then_succeeds_even_if_missing_somewhere() {
    let fixture = Fixture::new(&[("de.yaml", "a: 'Hallo'\n"), ("en.yaml", "")]);
    let container = fixture.container(Arc::new(MockPrompter::default()));

    assert!(cmd_get(&container, "a").is_ok());
}

#[test]
fn given_unparsable_file_when_getting_then_reports_batch_failure() {
    let fixture = Fixture::new(&[("de.yaml", "a: [\n"), ("en.yaml", "a: 'x'\n")]);
    let container = fixture.container(Arc::new(MockPrompter::default()));

    let err = cmd_get(&container, "a").unwrap_err();

    assert!(matches!(err, CliError::BatchFailed { failed: 1, total: 2 }));
}
