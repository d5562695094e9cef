//! Five-fret guitar hit-detection engine.
//!
//! This crate is pure logic: it owns no audio, no rendering, no chart
//! parsing, and does no file or network I/O. A host feeds it notes, folds in
//! `GameInput`s, drives `tick`, and observes outcomes through `EventSink`.

mod cursor;
mod error;
mod fret_state;
mod gates;
mod hit_window;
mod input;
mod note;
mod params;
mod policy;
mod resolver;
mod sink;
mod sustain;
mod timers;

pub use cursor::EventCursor;
pub use error::EngineError;
pub use fret_state::{can_hit_with_mask, can_note_be_hit};
pub use gates::{FlagOracle, InMemoryFlagOracle, NoOverridesOracle, OverrideGates, ProfileFlag};
pub use hit_window::HitWindow;
pub use input::{FretIndex, GameInput, InputAction, InputFlags};
pub use note::{
    has_no_frets, normalize_open_bit, Note, BLUE, FRET_BITS_MASK, GREEN, NUM_FRETS, OPEN_BIT,
    ORANGE, RED, YELLOW,
};
pub use params::{EngineParameters, EngineParametersBuilder};
pub use policy::InstrumentPolicy;
pub use resolver::HitEngine;
pub use sink::{EventSink, RecordingSink};
pub use sustain::{Sustain, SustainSet};
pub use timers::{Timer, TimerKind, TimerSet};
