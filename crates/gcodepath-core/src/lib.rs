//! # gcodepath Core
//!
//! Position-tracking G-code generation.
//! Provides the motion engine (linear, absolute, rectangle and meander moves),
//! the position store and motion mode it maintains, configurable dialects,
//! command sinks and output sessions.
//!
//! ```
//! use gcodepath_core::{MemorySink, MotionEngine, MoveRequest};
//!
//! let mut engine = MotionEngine::new(MemorySink::new());
//! engine.move_linear(&MoveRequest::from_pairs([("x", 10.0), ("y", 10.0)])?)?;
//! assert_eq!(engine.sink().lines(), &["G1 X10 Y10".to_string()]);
//! # Ok::<(), gcodepath_core::Error>(())
//! ```

pub mod axis;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod position;
pub mod session;
pub mod sink;

pub use axis::{Axis, MoveRequest};
pub use dialect::Dialect;
pub use engine::{
    Corner, Direction, MeanderParameters, MeanderSummary, MotionEngine, Orientation,
};
pub use error::{Error, MotionError, Result};
pub use position::{MotionMode, PositionStore};
pub use session::{FileSink, Session, SessionOptions};
pub use sink::{CommandSink, MemorySink, WriterSink};
