//! Axis identifiers and move requests

use crate::error::MotionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named degree of freedom such as X, Y or a rotary axis.
///
/// Names are case-insensitive and stored uppercase; a well-formed name is
/// one to four ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Axis(String);

impl Axis {
    /// Longest accepted axis name
    pub const MAX_LEN: usize = 4;

    /// Parse and normalise an axis name
    pub fn new(name: &str) -> Result<Self, MotionError> {
        let trimmed = name.trim();
        let well_formed = !trimmed.is_empty()
            && trimmed.len() <= Self::MAX_LEN
            && trimmed.chars().all(|c| c.is_ascii_alphabetic());
        if !well_formed {
            return Err(MotionError::InvalidAxis {
                name: name.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The X axis
    pub fn x() -> Self {
        Self("X".to_string())
    }

    /// The Y axis
    pub fn y() -> Self {
        Self("Y".to_string())
    }

    /// The Z axis
    pub fn z() -> Self {
        Self("Z".to_string())
    }

    /// Uppercase name as written in commands
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Axis {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Axis {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Axis> for String {
    fn from(axis: Axis) -> Self {
        axis.0
    }
}

/// An ordered mapping from axis to value.
///
/// Values are deltas in relative mode and targets in absolute mode. Order is
/// preserved so the emitted words follow the order the caller gave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveRequest {
    entries: Vec<(Axis, f64)>,
}

impl MoveRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from `(name, value)` pairs, validating every name
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, MotionError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut request = Self::new();
        for (name, value) in pairs {
            request.push(Axis::new(name)?, value)?;
        }
        Ok(request)
    }

    /// Single-axis request
    pub fn single(axis: Axis, value: f64) -> Result<Self, MotionError> {
        let mut request = Self::new();
        request.push(axis, value)?;
        Ok(request)
    }

    /// Builder form of [`MoveRequest::push`]
    pub fn with(mut self, axis: Axis, value: f64) -> Result<Self, MotionError> {
        self.push(axis, value)?;
        Ok(self)
    }

    /// Append an axis. Duplicates and non-finite values are rejected.
    pub fn push(&mut self, axis: Axis, value: f64) -> Result<(), MotionError> {
        if !value.is_finite() {
            return Err(MotionError::invalid_parameter(
                axis.as_str(),
                format!("value must be finite, got {}", value),
            ));
        }
        if self.contains(&axis) {
            return Err(MotionError::DuplicateAxis {
                axis: axis.to_string(),
            });
        }
        self.entries.push((axis, value));
        Ok(())
    }

    /// Whether the axis is part of this request
    pub fn contains(&self, axis: &Axis) -> bool {
        self.entries.iter().any(|(a, _)| a == axis)
    }

    /// Value for an axis, if present
    pub fn get(&self, axis: &Axis) -> Option<f64> {
        self.entries
            .iter()
            .find(|(a, _)| a == axis)
            .map(|(_, v)| *v)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Axis, f64)> {
        self.entries.iter().map(|(a, v)| (a, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails with [`MotionError::EmptyMoveRequest`] when no axis is set
    pub fn ensure_not_empty(&self) -> Result<(), MotionError> {
        if self.is_empty() {
            Err(MotionError::EmptyMoveRequest)
        } else {
            Ok(())
        }
    }
}
