//! Error type shared by every service of the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV syntax problem other than an I/O failure (e.g. invalid UTF-8).
    #[error("CSV error: {0}")]
    Csv(String),

    /// The keyterm header row lacks one of the required columns.
    #[error("keyterm header is missing column `{0}`")]
    MissingColumn(&'static str),

    /// A keyterm row does not have as many fields as the header.
    #[error("malformed keyterm record at line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid keyterm pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no keyterms loaded")]
    KeytermsNotLoaded,

    #[error("workspace is not open")]
    WorkspaceNotOpen,

    #[error("story not found: {0}")]
    StoryNotFound(String),

    #[error("no active story")]
    NoActiveStory,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("unknown command")]
    UnknownCommand,
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return CoreError::Csv(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => CoreError::Io(e),
            other => CoreError::Csv(format!("{other:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
