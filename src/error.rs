//! Error types for layout loading, simulation and fuel edits

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FuelError {
    #[error("Malformed core layout: {0}")]
    MalformedLayout(String),

    #[error("Fuel-age grid inconsistent with layout: {0}")]
    InvalidState(String),

    #[error("Age {age} at row={row}, col={col} is outside 0..={max_age}")]
    OutOfRange {
        row: usize,
        col: usize,
        age: i32,
        max_age: u8,
    },

    #[error("Symmetry image row={row}, col={col} is not a fuel slot")]
    SymmetryViolation { row: usize, col: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock '{0}' was poisoned by a panic in another thread")]
    LockPoisoned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FuelError {
    /// True for rejections the operator can simply retry differently.
    /// Everything else is a broken scenario or a caller bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FuelError::OutOfRange { .. })
    }
}

pub type FuelResult<T> = Result<T, FuelError>;

/// Error returned by the symmetric edit operator.
pub type EditError = FuelError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_out_of_range_is_recoverable() {
        let rejected = FuelError::OutOfRange { row: 0, col: 0, age: 5, max_age: 4 };
        assert!(rejected.is_recoverable());
        assert!(!FuelError::SymmetryViolation { row: 1, col: 2 }.is_recoverable());
        assert!(!FuelError::MalformedLayout("ragged".into()).is_recoverable());
        assert!(!FuelError::InvalidState("missing age".into()).is_recoverable());
    }

    #[test]
    fn test_messages_name_the_cell() {
        let msg = FuelError::OutOfRange { row: 2, col: 3, age: -1, max_age: 4 }.to_string();
        assert!(msg.contains("row=2"), "{msg}");
        assert!(msg.contains("col=3"), "{msg}");
        assert!(msg.contains("-1"), "{msg}");
    }
}
