//! Meander (boustrophedon) infill

use super::{Corner, MotionEngine};
use crate::axis::Axis;
use crate::error::{MotionError, Result};
use crate::position::MotionMode;
use crate::sink::CommandSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative spacing differences below this are treated as equal
const SPACING_TOLERANCE: f64 = 1e-9;

/// Axis carrying the long parallel sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Orientation {
    /// Sweeps run along X, jogs along Y
    #[default]
    X,
    /// Sweeps run along Y, jogs along X
    Y,
}

impl Orientation {
    pub fn code(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Orientation {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(MotionError::InvalidEnumValue {
                kind: "orientation",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = MotionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(orientation: Orientation) -> Self {
        orientation.code().to_string()
    }
}

/// Parameters for a meander fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanderParameters {
    /// Extent along X (mm)
    pub width: f64,
    /// Extent along Y (mm)
    pub height: f64,
    /// Requested distance between sweeps (mm)
    pub spacing: f64,
    /// Corner the tool starts from
    #[serde(default)]
    pub start: Corner,
    /// Axis of the sweeps
    #[serde(default)]
    pub orientation: Orientation,
    /// Stop after the last jog instead of closing with a final sweep
    #[serde(default)]
    pub tail: bool,
}

impl MeanderParameters {
    pub fn new(width: f64, height: f64, spacing: f64) -> Self {
        Self {
            width,
            height,
            spacing,
            start: Corner::LowerLeft,
            orientation: Orientation::X,
            tail: false,
        }
    }

    pub fn start(mut self, start: Corner) -> Self {
        self.start = start;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn tail(mut self, tail: bool) -> Self {
        self.tail = tail;
        self
    }
}

/// What a meander actually did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanderSummary {
    /// Number of sweep/jog pairs
    pub passes: u32,
    /// Spacing the caller asked for
    pub requested_spacing: f64,
    /// Spacing used for every jog; its sum over all passes equals the minor extent
    pub actual_spacing: f64,
}

impl MeanderSummary {
    pub fn spacing_changed(&self) -> bool {
        let actual = self.actual_spacing.abs();
        (actual - self.requested_spacing).abs()
            > SPACING_TOLERANCE * self.requested_spacing.max(actual)
    }
}

/// Sweep geometry after corner reflection and axis assignment
#[derive(Debug, Clone, PartialEq)]
struct MeanderPlan {
    major_axis: Axis,
    major: f64,
    minor_axis: Axis,
    summary: MeanderSummary,
}

fn plan(params: &MeanderParameters) -> std::result::Result<MeanderPlan, MotionError> {
    for (name, value) in [("width", params.width), ("height", params.height)] {
        if !value.is_finite() {
            return Err(MotionError::invalid_parameter(name, "must be finite"));
        }
    }
    let spacing = params.spacing;
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(MotionError::invalid_parameter(
            "spacing",
            format!("must be > 0, got {}", spacing),
        ));
    }

    let (width, height) = match params.start {
        Corner::LowerLeft => (params.width, params.height),
        Corner::UpperLeft => (params.width, -params.height),
        Corner::UpperRight => (-params.width, -params.height),
        Corner::LowerRight => (-params.width, params.height),
    };

    let (major_axis, major, minor_axis, minor) = match params.orientation {
        Orientation::X => (Axis::x(), width, Axis::y(), height),
        Orientation::Y => (Axis::y(), height, Axis::x(), width),
    };

    // Ceil for a positive minor extent, floor of the magnitude otherwise.
    let passes = if minor > 0.0 {
        (minor / spacing).ceil()
    } else {
        (minor.abs() / spacing).floor()
    };
    if passes < 1.0 {
        return Err(MotionError::invalid_parameter(
            "spacing",
            format!(
                "{} leaves no pass across a minor extent of {}",
                spacing, minor
            ),
        ));
    }
    if passes > f64::from(u32::MAX) {
        return Err(MotionError::invalid_parameter(
            "spacing",
            format!("{} needs too many passes across {}", spacing, minor),
        ));
    }

    Ok(MeanderPlan {
        major_axis,
        major,
        minor_axis,
        summary: MeanderSummary {
            passes: passes as u32,
            requested_spacing: spacing,
            actual_spacing: minor / passes,
        },
    })
}

impl<S: CommandSink> MotionEngine<S> {
    /// Fill a rectangle with back-and-forth sweeps.
    ///
    /// Runs in relative mode and restores the previous mode afterwards. When the
    /// requested spacing does not divide the minor extent the spacing is
    /// adjusted, a warning is logged and a comment recording the change is
    /// written to the stream.
    pub fn meander(&mut self, params: &MeanderParameters) -> Result<MeanderSummary> {
        let plan = plan(params)?;
        let summary = plan.summary;

        if summary.spacing_changed() {
            tracing::warn!(
                requested = summary.requested_spacing,
                actual = summary.actual_spacing,
                "meander spacing adjusted to divide the fill evenly"
            );
            self.comment(&format!(
                "WARNING! meander spacing updated from {} to {}",
                summary.requested_spacing, summary.actual_spacing
            ))?;
        }

        let previous = self.mode();
        if previous != MotionMode::Relative {
            self.relative()?;
        }

        let mut sign = 1.0;
        for _ in 0..summary.passes {
            self.move_axis(plan.major_axis.clone(), sign * plan.major)?;
            self.move_axis(plan.minor_axis.clone(), summary.actual_spacing)?;
            sign = -sign;
        }
        if !params.tail {
            self.move_axis(plan.major_axis.clone(), sign * plan.major)?;
        }

        if previous != MotionMode::Relative {
            self.set_mode(previous)?;
        }
        tracing::debug!(passes = summary.passes, "meander complete");
        Ok(summary)
    }
}
