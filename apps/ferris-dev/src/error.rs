//! Error type shared by all ferris-dev operations.

/// Failures that stop a subcommand before or while it drives external tools.
///
/// A wrapped tool exiting non-zero is not an error: it is reported through
/// the exit code of the task. These variants cover everything that prevents
/// the tool from being run at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("required tool not found: {0}")]
    ToolMissing(String),

    #[error("not a git repository: {0}")]
    NotGitRepo(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, Error>;
