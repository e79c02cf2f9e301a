//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Add or update one translation key in every locale file, keeping keys sorted
#[derive(Parser, Debug)]
#[command(name = "l10n-set")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Directory holding the locale files (default: <project>/translations)
    #[arg(short, long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Locale file extension; repeat for several (default: yaml)
    #[arg(short, long = "ext", global = true)]
    pub extensions: Vec<String>,

    /// Locale whose collation orders the keys (e.g. de, sv, und)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Stop at the first file that fails
    #[arg(long, global = true)]
    pub fail_fast: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set a value in every locale file (prompts for missing arguments)
    Set {
        /// Dotted key path, e.g. notifications.new-results.newfield
        path: Option<String>,
        /// Value to store
        value: Option<String>,
    },

    /// Show the value at a key path in every locale file
    Get {
        /// Dotted key path
        path: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_no_subcommand_when_parsing_then_command_is_none() {
        let cli = Cli::try_parse_from(["l10n-set"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn given_set_with_args_when_parsing_then_captures_path_and_value() {
        let cli = Cli::try_parse_from(["l10n-set", "-vv", "set", "a.b", "Hello world"]).unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Set { path, value }) => {
                assert_eq!(path.as_deref(), Some("a.b"));
                assert_eq!(value.as_deref(), Some("Hello world"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from([
            "l10n-set", "get", "a.b", "-d", "i18n", "-e", "yml", "-e", "yaml", "--locale", "de",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("i18n")));
        assert_eq!(cli.extensions, vec!["yml", "yaml"]);
        assert_eq!(cli.locale.as_deref(), Some("de"));
    }
}
