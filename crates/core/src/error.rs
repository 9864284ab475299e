use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "options {first:?} and {second:?} in group {group} both resolve to key {key:?}"
    )]
    DuplicateOptionKey {
        group: String,
        key: String,
        first: String,
        second: String,
    },
    #[error("invalid field path {0:?} (expected <group>.<key>)")]
    InvalidFieldPath(String),
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
    #[error("date of birth {dob} is after {today}")]
    BirthDateInFuture {
        dob: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("a submission is already in progress")]
    SubmissionInProgress,
    #[error("failed to parse form state at {path}: {message}")]
    FormStateParse { path: String, message: String },
    #[error("unsupported form file extension: {0}")]
    UnsupportedFormFile(String),
    #[error("failed to read form file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize payload: {0}")]
    Serialization(serde_json::Error),
}

pub type FormResult<T> = std::result::Result<T, FormError>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to create session directory: {0}")]
    SessionDirCreation(std::io::Error),
    #[error("failed to write session file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read session file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove session file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize session: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize session: {0}")]
    Deserialization(serde_json::Error),
    #[error("session token cannot be empty")]
    EmptyToken,
    #[error("session lock poisoned")]
    LockPoisoned,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
