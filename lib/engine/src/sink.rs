//! Where the resolver reports observable outcomes.

use crate::note::Note;

/// Observer of engine outcomes. All methods default to no-ops so a test
/// harness, or a host that only cares about a few events, can implement
/// just what it needs.
pub trait EventSink {
    fn on_note_hit(&mut self, _note: &Note) {}
    fn on_note_missed(&mut self, _note: &Note) {}
    fn on_overstrum(&mut self) {}
    fn on_ghost_input(&mut self) {}
    fn on_sustain_start(&mut self, _note: &Note) {}
    fn on_sustain_end(&mut self, _note: &Note, _completed: bool) {}
    fn on_combo_change(&mut self, _new_combo: u32) {}
    fn on_star_power_state_change(&mut self, _active: bool) {}
}

/// An `EventSink` that records every call for assertions in tests. Notes
/// are identified by their chart `tick`, the only stable value a bare
/// `Note` carries.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub hits: Vec<u32>,
    pub misses: Vec<u32>,
    pub overstrums: u32,
    pub ghost_inputs: u32,
    pub sustain_starts: Vec<u32>,
    pub sustain_ends: Vec<(u32, bool)>,
    pub combo_history: Vec<u32>,
    pub star_power_changes: Vec<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn on_note_hit(&mut self, note: &Note) {
        self.hits.push(note.tick);
    }

    fn on_note_missed(&mut self, note: &Note) {
        self.misses.push(note.tick);
    }

    fn on_overstrum(&mut self) {
        self.overstrums += 1;
    }

    fn on_ghost_input(&mut self) {
        self.ghost_inputs += 1;
    }

    fn on_sustain_start(&mut self, note: &Note) {
        self.sustain_starts.push(note.tick);
    }

    fn on_sustain_end(&mut self, note: &Note, completed: bool) {
        self.sustain_ends.push((note.tick, completed));
    }

    fn on_combo_change(&mut self, new_combo: u32) {
        self.combo_history.push(new_combo);
    }

    fn on_star_power_state_change(&mut self, active: bool) {
        self.star_power_changes.push(active);
    }
}
