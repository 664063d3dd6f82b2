use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error when user input fails
    #[error("prompt error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error when a requested profile name is not in the store
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
    /// Error when a profile with the same name is already stored
    #[error("profile '{0}' already exists")]
    DuplicateProfile(String),
    /// Error when a store line does not decode as a profile
    #[error("corrupt profile store: {0}")]
    CorruptStore(String),
    /// Error during input validation
    #[error("{0}")]
    InvalidField(String),
    /// Error when writing a profile onto git configuration fails
    #[error("failed to apply profile: {0}")]
    Apply(String),
    /// Error when the git executable cannot be run or returns unusable output
    #[error("git error: {0}")]
    ExternalTool(String),
    /// Error when a repository scoped operation runs outside a git repository
    #[error("not inside a git repository")]
    NotInGitRepository,
}
