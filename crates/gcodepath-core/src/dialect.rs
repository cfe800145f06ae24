//! G-code dialect definitions.
//!
//! The engine only knows a handful of opcodes; the dialect decides how each one
//! is spelled and how numbers and comments are written.

use crate::axis::MoveRequest;
use serde::{Deserialize, Serialize};

/// Opcode vocabulary and formatting rules for one machine controller family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Dialect name.
    pub name: String,
    /// Linear (feed) motion opcode.
    pub linear_move: String,
    /// Rapid motion opcode.
    pub rapid_move: String,
    /// Switch to absolute distance mode.
    pub absolute_mode: String,
    /// Switch to relative distance mode.
    pub relative_mode: String,
    /// Redefine the current position without moving.
    pub set_position: String,
    /// Dwell opcode.
    pub dwell: String,
    /// Word carrying the dwell duration.
    pub dwell_word: String,
    /// Word carrying the feed rate.
    pub feed_word: String,
    /// Text placed before a comment.
    pub comment_prefix: String,
    /// Text placed after a comment.
    pub comment_suffix: String,
    /// Fixed number of decimals; `None` writes the shortest exact form.
    pub decimals: Option<usize>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::standard()
    }
}

impl Dialect {
    /// Names accepted by [`Dialect::preset`].
    pub const PRESETS: [&'static str; 3] = ["standard", "grbl", "linuxcnc"];

    /// Plain RS-274 style output with `;` comments.
    pub fn standard() -> Self {
        Self {
            name: "standard".into(),
            linear_move: "G1".into(),
            rapid_move: "G0".into(),
            absolute_mode: "G90".into(),
            relative_mode: "G91".into(),
            set_position: "G92".into(),
            dwell: "G4".into(),
            dwell_word: "P".into(),
            feed_word: "F".into(),
            comment_prefix: "; ".into(),
            comment_suffix: String::new(),
            decimals: None,
        }
    }

    /// GRBL: parenthesised comments, three decimals.
    pub fn grbl() -> Self {
        Self {
            name: "grbl".into(),
            comment_prefix: "(".into(),
            comment_suffix: ")".into(),
            decimals: Some(3),
            ..Self::standard()
        }
    }

    /// LinuxCNC: parenthesised comments, four decimals.
    pub fn linuxcnc() -> Self {
        Self {
            name: "linuxcnc".into(),
            comment_prefix: "(".into(),
            comment_suffix: ")".into(),
            decimals: Some(4),
            ..Self::standard()
        }
    }

    /// Look up a built-in dialect by name (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::standard()),
            "grbl" => Some(Self::grbl()),
            "linuxcnc" => Some(Self::linuxcnc()),
            _ => None,
        }
    }

    /// Write a number using this dialect's precision.
    pub fn format_value(&self, value: f64) -> String {
        let text = match self.decimals {
            Some(digits) => format!("{:.*}", digits, value),
            // `-0.0 == 0.0`, so this also clears the sign of negative zero
            None if value == 0.0 => "0".to_string(),
            None => format!("{}", value),
        };
        match text.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => text,
        }
    }

    /// `<opcode> AXIS<value> ...`
    pub fn format_move(&self, opcode: &str, request: &MoveRequest) -> String {
        let mut line = opcode.to_string();
        for (axis, value) in request.iter() {
            line.push(' ');
            line.push_str(axis.as_str());
            line.push_str(&self.format_value(value));
        }
        line
    }

    /// Feed rate line, e.g. `F1200`
    pub fn format_feed(&self, rate: f64) -> String {
        format!("{}{}", self.feed_word, self.format_value(rate))
    }

    /// Dwell line, e.g. `G4 P0.5`
    pub fn format_dwell(&self, seconds: f64) -> String {
        format!("{} {}{}", self.dwell, self.dwell_word, self.format_value(seconds))
    }

    pub fn format_comment(&self, text: &str) -> String {
        format!("{}{}{}", self.comment_prefix, text, self.comment_suffix)
    }

    /// Opcodes that must not be blank, paired with their field names.
    pub fn opcodes(&self) -> [(&'static str, &str); 8] {
        [
            ("linear_move", self.linear_move.as_str()),
            ("rapid_move", self.rapid_move.as_str()),
            ("absolute_mode", self.absolute_mode.as_str()),
            ("relative_mode", self.relative_mode.as_str()),
            ("set_position", self.set_position.as_str()),
            ("dwell", self.dwell.as_str()),
            ("dwell_word", self.dwell_word.as_str()),
            ("feed_word", self.feed_word.as_str()),
        ]
    }
}
