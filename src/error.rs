use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::clock::TimeParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("partition not found: {path}")]
    NotFound { path: String },
    #[error("parse error in {source_path} line {line}: {message}")]
    Parse {
        source_path: String,
        line: usize,
        message: String,
    },
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn invalid_time(what: &str, err: TimeParseError) -> Self {
        Error::InvalidInput(format!("{what}: {err}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// The last preceding `after` and the first following `before` disagree.
    Conflict {
        field: String,
        preceding: Value,
        following: Value,
    },
    NoData { fields: Vec<String> },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Conflict {
                field,
                preceding,
                following,
            } => write!(
                f,
                "mismatched values for field {field}: preceding after={preceding}, following before={following}"
            ),
            DataError::NoData { fields } => {
                write!(f, "no data found for fields [{}]", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for DataError {}

pub type Result<T> = std::result::Result<T, Error>;
