//! Error types for pagefix operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cross-reference table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("cross-reference table unavailable: {0}")]
    TableUnavailable(String),

    #[error("too many appendices: {0} (at most 26 can be lettered)")]
    TooManyAppendices(usize),

    #[error("duplicate slug in outline: {0}")]
    DuplicateSlug(String),
}

pub type Result<T> = std::result::Result<T, Error>;
