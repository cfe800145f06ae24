//! Position tracking and motion mode
//!
//! This module provides:
//! - [`MotionMode`], the absolute/relative distance mode
//! - [`PositionStore`], the current absolute coordinate of every axis seen so far

use crate::axis::{Axis, MoveRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Distance mode governing how move values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    /// Values are target coordinates (G90)
    #[default]
    Absolute,
    /// Values are deltas from the current position (G91)
    Relative,
}

impl MotionMode {
    pub fn is_relative(self) -> bool {
        self == MotionMode::Relative
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Relative => write!(f, "relative"),
        }
    }
}

/// Current absolute coordinate of each axis.
///
/// Axes are created on first reference; an axis never referenced reports
/// `None` from [`PositionStore::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionStore {
    coords: BTreeMap<Axis, f64>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinate of an axis, `None` when the axis was never referenced
    pub fn get(&self, axis: &Axis) -> Option<f64> {
        self.coords.get(axis).copied()
    }

    /// Coordinate of an axis, treating unknown axes as 0
    pub fn get_or_zero(&self, axis: &Axis) -> f64 {
        self.get(axis).unwrap_or(0.0)
    }

    pub fn is_known(&self, axis: &Axis) -> bool {
        self.coords.contains_key(axis)
    }

    /// Overwrite a single coordinate
    pub fn set(&mut self, axis: Axis, value: f64) {
        self.coords.insert(axis, value);
    }

    /// Apply a primitive move: add in relative mode, replace in absolute mode
    pub fn apply(&mut self, request: &MoveRequest, mode: MotionMode) {
        for (axis, value) in request.iter() {
            let slot = self.coords.entry(axis.clone()).or_insert(0.0);
            match mode {
                MotionMode::Relative => *slot += value,
                MotionMode::Absolute => *slot = value,
            }
        }
    }

    /// Iterate over known axes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&Axis, f64)> {
        self.coords.iter().map(|(a, v)| (a, *v))
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

impl fmt::Display for PositionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (axis, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}:{:.3}", axis, value)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(pairs: &[(&str, f64)]) -> MoveRequest {
        MoveRequest::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_default_mode_is_absolute() {
        assert_eq!(MotionMode::default(), MotionMode::Absolute);
        assert!(!MotionMode::Absolute.is_relative());
    }

    #[test]
    fn test_absolute_apply_replaces() {
        let mut store = PositionStore::new();
        store.apply(&req(&[("x", 10.0), ("y", 10.0)]), MotionMode::Absolute);
        store.apply(&req(&[("x", 3.0)]), MotionMode::Absolute);
        assert_eq!(store.get(&Axis::x()), Some(3.0));
        assert_eq!(store.get(&Axis::y()), Some(10.0));
    }

    #[test]
    fn test_relative_apply_accumulates() {
        let mut store = PositionStore::new();
        store.apply(&req(&[("x", 1.5)]), MotionMode::Relative);
        store.apply(&req(&[("x", 1.5)]), MotionMode::Relative);
        assert_eq!(store.get(&Axis::x()), Some(3.0));
    }

    #[test]
    fn test_unknown_axis_is_created_on_first_reference() {
        let mut store = PositionStore::new();
        let a = Axis::new("a").unwrap();
        assert!(!store.is_known(&a));
        assert_eq!(store.get(&a), None);
        assert_eq!(store.get_or_zero(&a), 0.0);

        store.apply(&req(&[("a", 90.0)]), MotionMode::Relative);
        assert!(store.is_known(&a));
        assert_eq!(store.get(&a), Some(90.0));
    }

    #[test]
    fn test_display() {
        let mut store = PositionStore::new();
        store.set(Axis::y(), 2.0);
        store.set(Axis::x(), 1.0);
        assert_eq!(store.to_string(), "X:1.000 Y:2.000");
    }
}
