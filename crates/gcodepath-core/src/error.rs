//! Error handling for gcodepath
//!
//! Provides error types for the toolpath engine:
//! - Motion errors (rejected requests and parameters)
//! - Emitter errors (the command sink refused a line)
//! - File errors (output, header and footer files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Motion error type
///
/// Raised when a request is rejected before anything is emitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A move operation was invoked without any axes
    #[error("Move request has no axes")]
    EmptyMoveRequest,

    /// Axis name is not 1-4 ASCII letters
    #[error("Invalid axis name: '{name}'")]
    InvalidAxis {
        /// The rejected axis name.
        name: String,
    },

    /// The same axis appears twice in one request
    #[error("Axis {axis} given more than once")]
    DuplicateAxis {
        /// The repeated axis.
        axis: String,
    },

    /// A value outside a closed enumeration (direction, corner, orientation)
    #[error("Invalid {kind}: '{value}'")]
    InvalidEnumValue {
        /// Which enumeration was being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A numeric parameter is out of its valid domain
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl MotionError {
    /// Shorthand for [`MotionError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        MotionError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for gcodepath
///
/// A unified error type used by every public engine and session API.
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before emission
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// The command sink failed to accept a line
    #[error("Emitter failure: {0}")]
    Emitter(#[from] std::io::Error),

    /// A session file (output, header, footer) could not be opened or read
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a rejected request
    pub fn is_motion_error(&self) -> bool {
        matches!(self, Error::Motion(_))
    }

    /// Check if the sink failed
    pub fn is_emitter_failure(&self) -> bool {
        matches!(self, Error::Emitter(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_motion_error_display() {
        assert_eq!(
            MotionError::EmptyMoveRequest.to_string(),
            "Move request has no axes"
        );

        let err = MotionError::InvalidEnumValue {
            kind: "direction",
            value: "sideways".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid direction: 'sideways'");

        let err = MotionError::invalid_parameter("spacing", "must be > 0");
        assert_eq!(err.to_string(), "Invalid parameter 'spacing': must be > 0");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = MotionError::EmptyMoveRequest.into();
        assert!(err.is_motion_error());
        assert!(!err.is_emitter_failure());

        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(err.is_emitter_failure());
        assert_eq!(err.to_string(), "Emitter failure: closed");
    }

    #[test]
    fn test_transparent_motion_display() {
        let err: Error = MotionError::DuplicateAxis {
            axis: "X".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Axis X given more than once");
    }
}
