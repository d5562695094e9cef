//! Programmer-misuse diagnostics. Normal gameplay outcomes — miss,
//! overstrum, ghost input — are never represented here; they go through
//! `EventSink` instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("tick time {given} is before the previous tick time {previous}")]
    TicksOutOfOrder { previous: f64, given: f64 },

    #[error("note index {index} is out of range for a chart of {len} notes")]
    NoteIndexOutOfRange { index: usize, len: usize },
}
