//! Motion engine
//!
//! Owns the motion mode and the position store, turns move requests into
//! mode-correct command lines and hands each line to a [`CommandSink`].
//!
//! An engine is driven through `&mut self` and keeps no shared state, so
//! several engines can run side by side. A single engine must not be shared
//! between concurrent callers without external synchronization.
//!
//! The store is updated before the line is emitted. If the sink fails, the
//! store already reflects the failed move.

mod meander;
mod rect;

pub use meander::{MeanderParameters, MeanderSummary, Orientation};
pub use rect::{Corner, Direction};

use crate::axis::{Axis, MoveRequest};
use crate::dialect::Dialect;
use crate::error::{MotionError, Result};
use crate::position::{MotionMode, PositionStore};
use crate::sink::CommandSink;

/// Position-tracking G-code writer
#[derive(Debug)]
pub struct MotionEngine<S: CommandSink> {
    sink: S,
    dialect: Dialect,
    mode: MotionMode,
    position: PositionStore,
    feed_rate: Option<f64>,
}

impl<S: CommandSink> MotionEngine<S> {
    /// Create an engine with the standard dialect, in absolute mode
    pub fn new(sink: S) -> Self {
        Self::with_dialect(sink, Dialect::standard())
    }

    pub fn with_dialect(sink: S, dialect: Dialect) -> Self {
        Self {
            sink,
            dialect,
            mode: MotionMode::default(),
            position: PositionStore::new(),
            feed_rate: None,
        }
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn is_relative(&self) -> bool {
        self.mode.is_relative()
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Current absolute coordinates
    pub fn position(&self) -> &PositionStore {
        &self.position
    }

    /// Seed coordinates without emitting anything
    pub fn set_position(&mut self, request: &MoveRequest) {
        self.position.apply(request, MotionMode::Absolute);
    }

    /// Last feed rate set through [`MotionEngine::feed`]
    pub fn feed_rate(&self) -> Option<f64> {
        self.feed_rate
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit one line to the sink. Line breaks inside `line` are rejected.
    pub fn write_raw(&mut self, line: &str) -> Result<()> {
        if line.contains(['\n', '\r']) {
            return Err(
                MotionError::invalid_parameter("line", "must not contain line breaks").into(),
            );
        }
        tracing::debug!(line, "emit");
        self.sink.emit(line)?;
        Ok(())
    }

    pub fn comment(&mut self, text: &str) -> Result<()> {
        let line = self.dialect.format_comment(text);
        self.write_raw(&line)
    }

    /// Switch distance mode. The mode command is emitted on every call.
    pub fn set_mode(&mut self, mode: MotionMode) -> Result<()> {
        let opcode = match mode {
            MotionMode::Absolute => self.dialect.absolute_mode.clone(),
            MotionMode::Relative => self.dialect.relative_mode.clone(),
        };
        tracing::debug!(from = %self.mode, to = %mode, "mode switch");
        self.mode = mode;
        self.write_raw(&opcode)
    }

    pub fn absolute(&mut self) -> Result<()> {
        self.set_mode(MotionMode::Absolute)
    }

    pub fn relative(&mut self) -> Result<()> {
        self.set_mode(MotionMode::Relative)
    }

    /// Linear move interpreted in the active mode
    pub fn move_linear(&mut self, request: &MoveRequest) -> Result<()> {
        let opcode = self.dialect.linear_move.clone();
        self.primitive(&opcode, request)
    }

    /// Rapid move interpreted in the active mode
    pub fn rapid(&mut self, request: &MoveRequest) -> Result<()> {
        let opcode = self.dialect.rapid_move.clone();
        self.primitive(&opcode, request)
    }

    fn primitive(&mut self, opcode: &str, request: &MoveRequest) -> Result<()> {
        request.ensure_not_empty()?;
        self.position.apply(request, self.mode);
        let line = self.dialect.format_move(opcode, request);
        self.write_raw(&line)
    }

    /// Move to absolute coordinates whatever the active mode.
    ///
    /// In relative mode this brackets the move with an absolute and a relative
    /// mode switch; the mode on return equals the mode on entry.
    pub fn abs_move(&mut self, request: &MoveRequest) -> Result<()> {
        request.ensure_not_empty()?;
        if self.is_relative() {
            self.absolute()?;
            self.move_linear(request)?;
            self.relative()
        } else {
            self.move_linear(request)
        }
    }

    /// Absolute move of X and Y to zero
    pub fn home(&mut self) -> Result<()> {
        let request = MoveRequest::single(Axis::x(), 0.0)?.with(Axis::y(), 0.0)?;
        self.abs_move(&request)
    }

    /// Declare the current location to have the given coordinates (no motion)
    pub fn set_home(&mut self, request: &MoveRequest) -> Result<()> {
        request.ensure_not_empty()?;
        self.position.apply(request, MotionMode::Absolute);
        let line = self.dialect.format_move(&self.dialect.set_position, request);
        self.write_raw(&line)
    }

    pub fn feed(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(
                MotionError::invalid_parameter("feed", format!("must be > 0, got {}", rate)).into(),
            );
        }
        self.feed_rate = Some(rate);
        let line = self.dialect.format_feed(rate);
        self.write_raw(&line)
    }

    /// Pause for `seconds`
    pub fn dwell(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(MotionError::invalid_parameter(
                "dwell",
                format!("must be >= 0, got {}", seconds),
            )
            .into());
        }
        let line = self.dialect.format_dwell(seconds);
        self.write_raw(&line)
    }

    /// Flush the sink
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    fn move_axis(&mut self, axis: Axis, value: f64) -> Result<()> {
        let request = MoveRequest::single(axis, value)?;
        self.move_linear(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn req(pairs: &[(&str, f64)]) -> MoveRequest {
        MoveRequest::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_fresh_engine_is_absolute_and_empty() {
        let engine = MotionEngine::new(MemorySink::new());
        assert_eq!(engine.mode(), MotionMode::Absolute);
        assert!(engine.position().is_empty());
        assert!(engine.sink().lines().is_empty());
    }

    #[test]
    fn test_empty_request_rejected_without_side_effects() {
        let mut engine = MotionEngine::new(MemorySink::new());
        engine.relative().unwrap();
        for result in [
            engine.move_linear(&MoveRequest::new()),
            engine.abs_move(&MoveRequest::new()),
            engine.set_home(&MoveRequest::new()),
        ] {
            assert!(matches!(
                result,
                Err(crate::Error::Motion(MotionError::EmptyMoveRequest))
            ));
        }
        assert_eq!(engine.sink().lines(), &["G91".to_string()]);
        assert!(engine.is_relative());
    }

    #[test]
    fn test_rapid_uses_rapid_opcode() {
        let mut engine = MotionEngine::new(MemorySink::new());
        engine.rapid(&req(&[("z", 5.0)])).unwrap();
        assert_eq!(engine.sink().lines(), &["G0 Z5".to_string()]);
        assert_eq!(engine.position().get(&Axis::z()), Some(5.0));
    }

    #[test]
    fn test_feed_and_dwell() {
        let mut engine = MotionEngine::new(MemorySink::new());
        engine.feed(1200.0).unwrap();
        engine.dwell(0.5).unwrap();
        assert_eq!(engine.feed_rate(), Some(1200.0));
        assert_eq!(
            engine.sink().lines(),
            &["F1200".to_string(), "G4 P0.5".to_string()]
        );

        assert!(engine.feed(0.0).is_err());
        assert!(engine.dwell(-1.0).is_err());
        assert_eq!(engine.sink().lines().len(), 2);
    }

    #[test]
    fn test_multi_line_text_is_rejected() {
        let mut engine = MotionEngine::new(MemorySink::new());
        assert!(engine.write_raw("G1 X1\nG1 X2").unwrap_err().is_motion_error());
        assert!(engine.comment("first\r\nsecond").unwrap_err().is_motion_error());
        assert!(engine.sink().lines().is_empty());

        engine.comment("one line").unwrap();
        assert_eq!(engine.sink().lines(), &["; one line".to_string()]);
    }

    #[test]
    fn test_set_position_is_silent() {
        let mut engine = MotionEngine::new(MemorySink::new());
        engine.set_position(&req(&[("x", 4.0)]));
        assert_eq!(engine.position().get(&Axis::x()), Some(4.0));
        assert!(engine.sink().lines().is_empty());
    }
}
