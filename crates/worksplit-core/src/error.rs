//! Error types for worksplit

use thiserror::Error;

/// Main error type for worksplit
#[derive(Error, Debug)]
pub enum WorksplitError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The member list is empty after parsing
    #[error("No members given: enter at least one name")]
    NoMembers,

    /// Problem count below one
    #[error("Invalid problem count: {0} (must be at least 1)")]
    InvalidProblemCount(i64),

    /// Problem count above the configured limit
    #[error("Too many problems: {requested} (limit is {limit})")]
    TooManyProblems { requested: i64, limit: u32 },

    /// Subject label not in the configured list
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorksplitError {
    /// Whether the error was caused by bad user input rather than the server
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorksplitError::NoMembers
                | WorksplitError::InvalidProblemCount(_)
                | WorksplitError::TooManyProblems { .. }
                | WorksplitError::UnknownSubject(_)
        )
    }
}

/// Result type for worksplit operations
pub type WorksplitResult<T> = Result<T, WorksplitError>;

impl From<serde_json::Error> for WorksplitError {
    fn from(err: serde_json::Error) -> Self {
        WorksplitError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for WorksplitError {
    fn from(err: toml::de::Error) -> Self {
        WorksplitError::Config(err.to_string())
    }
}
