//! Rectangle tracing

use super::MotionEngine;
use crate::axis::Axis;
use crate::error::{MotionError, Result};
use crate::sink::CommandSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel direction around the perimeter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// Clockwise
    Cw,
    /// Counter-clockwise
    Ccw,
}

/// Corner of a rectangle relative to the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Corner {
    /// Lower left
    #[default]
    LowerLeft,
    /// Upper left
    UpperLeft,
    /// Upper right
    UpperRight,
    /// Lower right
    LowerRight,
}

impl Direction {
    pub fn code(self) -> &'static str {
        match self {
            Self::Cw => "CW",
            Self::Ccw => "CCW",
        }
    }
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LowerLeft,
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerRight,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::LowerLeft => "LL",
            Self::UpperLeft => "UL",
            Self::UpperRight => "UR",
            Self::LowerRight => "LR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CW" => Ok(Self::Cw),
            "CCW" => Ok(Self::Ccw),
            _ => Err(MotionError::InvalidEnumValue {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Corner {
    type Err = MotionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LL" => Ok(Self::LowerLeft),
            "UL" => Ok(Self::UpperLeft),
            "UR" => Ok(Self::UpperRight),
            "LR" => Ok(Self::LowerRight),
            _ => Err(MotionError::InvalidEnumValue {
                kind: "start corner",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = MotionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Corner {
    type Error = MotionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.code().to_string()
    }
}

impl From<Corner> for String {
    fn from(corner: Corner) -> Self {
        corner.code().to_string()
    }
}

/// One side of the rectangle: which dimension, and its sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Leg {
    PosX,
    NegX,
    PosY,
    NegY,
}

use Leg::{NegX, NegY, PosX, PosY};

/// Side order for every (direction, start corner) pair
const RECT_LEGS: [(Direction, Corner, [Leg; 4]); 8] = [
    (Direction::Cw, Corner::LowerLeft, [PosY, PosX, NegY, NegX]),
    (Direction::Cw, Corner::UpperLeft, [PosX, NegY, NegX, PosY]),
    (Direction::Cw, Corner::UpperRight, [NegY, NegX, PosY, PosX]),
    (Direction::Cw, Corner::LowerRight, [NegX, PosY, PosX, NegY]),
    (Direction::Ccw, Corner::LowerLeft, [PosX, PosY, NegX, NegY]),
    (Direction::Ccw, Corner::UpperLeft, [NegY, PosX, PosY, NegX]),
    (Direction::Ccw, Corner::UpperRight, [NegX, NegY, PosX, PosY]),
    (Direction::Ccw, Corner::LowerRight, [PosY, NegX, NegY, PosX]),
];

pub(crate) fn rect_legs(direction: Direction, start: Corner) -> [Leg; 4] {
    RECT_LEGS
        .iter()
        .find(|(d, c, _)| *d == direction && *c == start)
        .map(|(_, _, legs)| *legs)
        .unwrap_or_else(|| unreachable!("rectangle table covers every direction/corner pair"))
}

impl Leg {
    fn delta(self, width: f64, height: f64) -> (Axis, f64) {
        match self {
            PosX => (Axis::x(), width),
            NegX => (Axis::x(), -width),
            PosY => (Axis::y(), height),
            NegY => (Axis::y(), -height),
        }
    }
}

impl<S: CommandSink> MotionEngine<S> {
    /// Trace the perimeter of a `width` x `height` rectangle and return to the
    /// starting point.
    ///
    /// Emits four single-axis moves in the active mode without switching mode;
    /// callers normally want relative mode here.
    pub fn rect(
        &mut self,
        width: f64,
        height: f64,
        direction: Direction,
        start: Corner,
    ) -> Result<()> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() {
                return Err(MotionError::invalid_parameter(name, "must be finite").into());
            }
        }
        tracing::debug!(width, height, %direction, %start, "rect");
        for leg in rect_legs(direction, start) {
            let (axis, value) = leg.delta(width, height);
            self.move_axis(axis, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete_and_closed() {
        for direction in [Direction::Cw, Direction::Ccw] {
            for corner in Corner::ALL {
                let legs = rect_legs(direction, corner);
                let (mut x, mut y) = (0i32, 0i32);
                for leg in legs {
                    match leg {
                        PosX => x += 1,
                        NegX => x -= 1,
                        PosY => y += 1,
                        NegY => y -= 1,
                    }
                }
                assert_eq!((x, y), (0, 0), "{direction} {corner}");
            }
        }
    }

    #[test]
    fn test_first_leg_stays_inside_rectangle() {
        let expected = [
            (Direction::Cw, Corner::LowerLeft, PosY),
            (Direction::Cw, Corner::UpperLeft, PosX),
            (Direction::Cw, Corner::UpperRight, NegY),
            (Direction::Cw, Corner::LowerRight, NegX),
            (Direction::Ccw, Corner::LowerLeft, PosX),
            (Direction::Ccw, Corner::UpperLeft, NegY),
            (Direction::Ccw, Corner::UpperRight, NegX),
            (Direction::Ccw, Corner::LowerRight, PosY),
        ];
        for (direction, corner, first) in expected {
            assert_eq!(rect_legs(direction, corner)[0], first);
        }
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("cw".parse::<Direction>().unwrap(), Direction::Cw);
        assert_eq!("CCW".parse::<Direction>().unwrap(), Direction::Ccw);
        assert_eq!("ur".parse::<Corner>().unwrap(), Corner::UpperRight);
        assert!(matches!(
            "up".parse::<Corner>(),
            Err(MotionError::InvalidEnumValue { kind: "start corner", .. })
        ));
        assert!("clockwise".parse::<Direction>().is_err());
    }
}
