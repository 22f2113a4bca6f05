//! Validation error types

use std::fmt;

/// Validation error for request shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Numeric field is zero when a value is required
    Zero { field: &'static str },

    /// Numeric field is below zero
    Negative { field: &'static str, value: i64 },

    /// Value doesn't match required format (e.g. body or query parse failure)
    InvalidFormat { field: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::Zero { field } => write!(f, "{} is required and cannot be zero", field),
            Self::Negative { field, value } => {
                write!(f, "{} cannot be negative (got {})", field, value)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Zero { field: "age" };
        assert_eq!(err.to_string(), "age is required and cannot be zero");

        let err = ValidationError::Negative {
            field: "limit",
            value: -3,
        };
        assert_eq!(err.to_string(), "limit cannot be negative (got -3)");
    }
}
