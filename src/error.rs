//! Error type shared by the reactor core
//!
//! Caller misuse and broken internal invariants are reported here. Geometric
//! degeneracies (parallel rays, zero relative velocity) resolve to "no event"
//! and never reach this type.

use thiserror::Error;

use crate::sim::Shape;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ReactorError>;

#[derive(Debug, Error)]
pub enum ReactorError {
    /// Molecules need at least one unit of mass, and reactants' combined
    /// mass must fit in a `u32`
    #[error("invalid mass {0}: must be >= 1, and reacting masses must sum within u32")]
    InvalidMass(u32),

    /// Arena rectangle or display scale is degenerate
    #[error("invalid arena {width}x{height} at scale {scale}: all must be finite and > 0")]
    InvalidArena { width: f64, height: f64, scale: f64 },

    /// Negative or non-finite tick length
    #[error("invalid time step {0}: must be finite and >= 0")]
    InvalidTimeStep(f64),

    /// No reaction registered for a shape pair; the rule table is incomplete
    #[error("no reaction rule for {a:?} + {b:?}")]
    MissingReaction { a: Shape, b: Shape },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let e = ReactorError::InvalidMass(0);
        assert!(e.to_string().contains("mass"));

        let e = ReactorError::InvalidArena {
            width: 0.0,
            height: 10.0,
            scale: 1.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("arena"));
        assert!(msg.contains("0x10"));
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: ReactorError = parse.unwrap_err().into();
        assert!(matches!(err, ReactorError::Json(_)));
    }
}
