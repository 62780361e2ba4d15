//! Value Objects for the aocboard Domain
//!
//! Small validated primitives shared by the leaderboard builders.

use serde::Deserialize;
use std::fmt;

/// Domain errors raised while decoding upstream leaderboard documents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Upstream JSON did not have the expected shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

// =============================================================================
// NumericField
// =============================================================================

/// An integer the upstream API sends either as a JSON number or as a string.
///
/// Member ids, owner ids and the event year all show up in both forms
/// depending on the API revision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// Plain JSON number
    Number(u64),
    /// Decimal string, e.g. `"42"`
    Text(String),
}

impl NumericField {
    /// Coerce to `u64`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInput` if the text form is not a non-negative integer.
    pub fn to_u64(&self, field: &str) -> Result<u64, DomainError> {
        match self {
            NumericField::Number(n) => Ok(*n),
            NumericField::Text(s) => s.trim().parse::<u64>().map_err(|_| {
                DomainError::invalid_input(format!("{field} is not an integer: {s:?}"))
            }),
        }
    }

    /// Coerce to `i32` (used for the event year).
    pub fn to_i32(&self, field: &str) -> Result<i32, DomainError> {
        let value = self.to_u64(field)?;
        i32::try_from(value)
            .map_err(|_| DomainError::invalid_input(format!("{field} is out of range: {value}")))
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Number(n) => write!(f, "{n}"),
            NumericField::Text(s) => write!(f, "{s}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
