//! Job files
//!
//! A job is an ordered list of operations read from TOML or JSON and replayed
//! against a [`MotionEngine`].
//!
//! ```toml
//! [[operations]]
//! op = "relative"
//!
//! [[operations]]
//! op = "rect"
//! width = 10.0
//! height = 5.0
//! direction = "CW"
//! start = "LL"
//! ```

use anyhow::{bail, Context};
use gcodepath_core::{
    Axis, CommandSink, Corner, Direction, MeanderParameters, MeanderSummary, MotionEngine,
    MoveRequest, PositionStore,
};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Axis values keyed by name, kept in the order they were written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisMap(Vec<(String, f64)>);

impl AxisMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.push((name.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AxisMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for AxisMap {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for AxisMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct AxisMapVisitor;

impl<'de> Visitor<'de> for AxisMapVisitor {
    type Value = AxisMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of axis names to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<AxisMap, A::Error> {
        let mut axes = AxisMap::new();
        while let Some((name, value)) = access.next_entry::<String, f64>()? {
            axes.insert(name, value);
        }
        Ok(axes)
    }
}

impl<'de> Deserialize<'de> for AxisMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(AxisMapVisitor)
    }
}

fn default_direction() -> Direction {
    Direction::Cw
}

/// One step of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Absolute,
    Relative,
    Move {
        axes: AxisMap,
    },
    Rapid {
        axes: AxisMap,
    },
    AbsMove {
        axes: AxisMap,
    },
    Home,
    SetHome {
        axes: AxisMap,
    },
    Feed {
        rate: f64,
    },
    Dwell {
        seconds: f64,
    },
    Comment {
        text: String,
    },
    Raw {
        line: String,
    },
    Rect {
        width: f64,
        height: f64,
        #[serde(default = "default_direction")]
        direction: Direction,
        #[serde(default)]
        start: Corner,
    },
    Meander(MeanderParameters),
}

/// A named list of operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Outcome of [`Job::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    /// Number of operations executed
    pub operations: usize,
    /// Summary of every meander, in job order
    pub meanders: Vec<MeanderSummary>,
    /// Tool position after the last operation
    pub position: PositionStore,
}

fn to_request(axes: &AxisMap) -> gcodepath_core::Result<MoveRequest> {
    let mut request = MoveRequest::new();
    for (name, value) in axes.iter() {
        request.push(Axis::new(name)?, value)?;
    }
    Ok(request)
}

impl Job {
    /// Read a job from a `.toml` or `.json` file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let job: Self = match ext.as_deref() {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML job {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON job {}", path.display()))?,
            _ => bail!("Job file must be .toml or .json: {}", path.display()),
        };
        Ok(job)
    }

    /// Replay every operation against `engine`, stopping at the first error
    pub fn run<S: CommandSink>(
        &self,
        engine: &mut MotionEngine<S>,
    ) -> gcodepath_core::Result<JobReport> {
        let mut meanders = Vec::new();
        if let Some(name) = &self.name {
            tracing::info!(job = %name, operations = self.operations.len(), "running job");
        }

        for operation in &self.operations {
            match operation {
                Operation::Absolute => engine.absolute()?,
                Operation::Relative => engine.relative()?,
                Operation::Move { axes } => engine.move_linear(&to_request(axes)?)?,
                Operation::Rapid { axes } => engine.rapid(&to_request(axes)?)?,
                Operation::AbsMove { axes } => engine.abs_move(&to_request(axes)?)?,
                Operation::Home => engine.home()?,
                Operation::SetHome { axes } => engine.set_home(&to_request(axes)?)?,
                Operation::Feed { rate } => engine.feed(*rate)?,
                Operation::Dwell { seconds } => engine.dwell(*seconds)?,
                Operation::Comment { text } => engine.comment(text)?,
                Operation::Raw { line } => engine.write_raw(line)?,
                Operation::Rect {
                    width,
                    height,
                    direction,
                    start,
                } => engine.rect(*width, *height, *direction, *start)?,
                Operation::Meander(params) => meanders.push(engine.meander(params)?),
            }
        }

        Ok(JobReport {
            operations: self.operations.len(),
            meanders,
            position: engine.position().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodepath_core::{MemorySink, Orientation};

    #[test]
    fn test_parse_toml_operations() {
        let job: Job = toml::from_str(
            r#"
            name = "demo"

            [[operations]]
            op = "relative"

            [[operations]]
            op = "move"
            axes = { x = 1.0, y = 2.0 }

            [[operations]]
            op = "rect"
            width = 3.0
            height = 4.0
            start = "ur"

            [[operations]]
            op = "meander"
            width = 10.0
            height = 10.0
            spacing = 3.0
            orientation = "y"
            tail = true
            "#,
        )
        .unwrap();

        assert_eq!(job.name.as_deref(), Some("demo"));
        assert_eq!(job.operations.len(), 4);
        assert_eq!(
            job.operations[2],
            Operation::Rect {
                width: 3.0,
                height: 4.0,
                direction: Direction::Cw,
                start: Corner::UpperRight,
            }
        );
        match &job.operations[3] {
            Operation::Meander(params) => {
                assert_eq!(params.orientation, Orientation::Y);
                assert_eq!(params.start, Corner::LowerLeft);
                assert!(params.tail);
            }
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[test]
    fn test_bad_enum_value_fails_to_parse() {
        let result: Result<Job, _> = toml::from_str(
            r#"
            [[operations]]
            op = "rect"
            width = 1.0
            height = 1.0
            direction = "sideways"
            "#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid direction"), "{err}");
    }

    #[test]
    fn test_run_reports_position() {
        let job = Job {
            name: None,
            operations: vec![
                Operation::Relative,
                Operation::Move {
                    axes: AxisMap::from([("x", 2.0)]),
                },
                Operation::Meander(MeanderParameters::new(4.0, 2.0, 1.0)),
            ],
        };
        let mut engine = MotionEngine::new(MemorySink::new());
        let report = job.run(&mut engine).unwrap();

        assert_eq!(report.operations, 3);
        assert_eq!(report.meanders.len(), 1);
        assert_eq!(report.meanders[0].passes, 2);
        assert_eq!(report.position.get(&Axis::x()), Some(6.0));
        assert_eq!(report.position.get(&Axis::y()), Some(2.0));
    }

    #[test]
    fn test_axes_keep_written_order() {
        let job: Job = toml::from_str(
            r#"
            [[operations]]
            op = "move"
            axes = { z = 1.0, y = 2.0, x = 3.0 }
            "#,
        )
        .unwrap();
        let mut engine = MotionEngine::new(MemorySink::new());
        job.run(&mut engine).unwrap();
        assert_eq!(engine.sink().lines(), &["G1 Z1 Y2 X3".to_string()]);

        let job: Job =
            serde_json::from_str(r#"{"operations":[{"op":"rapid","axes":{"y":1.0,"x":2.0}}]}"#)
                .unwrap();
        let mut engine = MotionEngine::new(MemorySink::new());
        job.run(&mut engine).unwrap();
        assert_eq!(engine.sink().lines(), &["G0 Y1 X2".to_string()]);
    }

    #[test]
    fn test_duplicate_axis_in_json_is_rejected() {
        let job: Job =
            serde_json::from_str(r#"{"operations":[{"op":"move","axes":{"x":1.0,"x":2.0}}]}"#)
                .unwrap();
        let mut engine = MotionEngine::new(MemorySink::new());
        assert!(job.run(&mut engine).unwrap_err().is_motion_error());
        assert!(engine.sink().lines().is_empty());
    }

    #[test]
    fn test_run_rejects_bad_axis_name() {
        let job = Job {
            name: None,
            operations: vec![Operation::Move {
                axes: AxisMap::from([("x1", 2.0)]),
            }],
        };
        let mut engine = MotionEngine::new(MemorySink::new());
        assert!(job.run(&mut engine).unwrap_err().is_motion_error());
        assert!(engine.sink().lines().is_empty());
    }
}
