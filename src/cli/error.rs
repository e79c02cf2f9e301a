//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{failed} of {total} locale files could not be updated")]
    BatchFailed { failed: usize, total: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::BatchFailed { .. } => exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Input { .. } => exitcode::NOINPUT,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(
                        DomainError::EmptyKeyPath | DomainError::EmptySegment { .. },
                    ) => exitcode::USAGE,
                    ApplicationError::Domain(_) | ApplicationError::Yaml { .. } => {
                        exitcode::DATAERR
                    }
                    ApplicationError::DirectoryRead { .. } => exitcode::IOERR,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                    ApplicationError::Locale { .. } | ApplicationError::Config { .. } => {
                        exitcode::CONFIG
                    }
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    #[rstest]
    #[case(CliError::BatchFailed { failed: 1, total: 3 }, exitcode::DATAERR)]
    #[case(
        CliError::from(ApplicationError::from(DomainError::EmptyKeyPath)),
        exitcode::USAGE
    )]
    #[case(
        CliError::from(ApplicationError::Config { message: "bad".into() }),
        exitcode::CONFIG
    )]
    #[case(
        CliError::Infra(InfraError::Input {
            prompt: "Enter the value:".into(),
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "closed"),
        }),
        exitcode::NOINPUT
    )]
    #[case(
        CliError::from(ApplicationError::DirectoryRead {
            path: "translations".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }),
        exitcode::IOERR
    )]
    fn given_error_when_mapping_then_uses_sysexits_code(
        #[case] error: CliError,
        #[case] expected: i32,
    ) {
        assert_eq!(error.exit_code(), expected);
    }

    #[test]
    fn given_batch_failure_when_displaying_then_counts_files() {
        let err = CliError::BatchFailed { failed: 2, total: 5 };
        assert_eq!(err.to_string(), "2 of 5 locale files could not be updated");
    }
}
