//! Domain layer error types.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("must not be empty")]
    Empty,

    #[error("may not be greater than {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("must be a finite number")]
    NotFinite,

    #[error("must not be negative")]
    Negative,

    #[error("must be greater than zero")]
    Zero,

    #[error("must have 2 or 3 coordinates (got {0})")]
    PointArity(usize),

    #[error("must be a string")]
    NotAString,

    #[error("must be a number")]
    NotANumber,

    #[error("must be an array")]
    NotAnArray,

    #[error("must be [x, y], [x, y, pressure] or an object with x and y")]
    NotAPoint,
}

/// Field-level validation failures collected from a whole request.
///
/// Keys are field names as the client sent them (`pass`, `strokeId`,
/// `points.3`, ...); values are human readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` failed with `error`.
    pub fn push(&mut self, field: impl Into<String>, error: impl ToString) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(error.to_string());
    }

    /// Record that a required `field` was absent.
    pub fn missing(&mut self, field: impl Into<String>) {
        self.push(field, "is required");
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the given data was invalid")?;
        for (i, (field, messages)) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// RoomStore のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("room store unavailable: {0}")]
    Unavailable(String),
}

/// FanoutPublisher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("failed to encode event: {0}")]
    Encode(String),

    #[error("publish failed: {0}")]
    Unavailable(String),
}

/// チャンク再構成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReassemblyError {
    #[error("chunk index {index} is out of range for {total_chunks} chunks")]
    IndexOutOfRange { index: usize, total_chunks: usize },

    #[error("chunk announces {got} total chunks but the stroke started with {expected}")]
    TotalMismatch { expected: usize, got: usize },

    #[error("stroke is incomplete: {received} of {total_chunks} chunks received")]
    Incomplete {
        received: usize,
        total_chunks: usize,
    },
}
