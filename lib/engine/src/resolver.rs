//! `HitEngine`: the frame-level algorithm, run in lettered steps A–H
//! each tick.

use uuid::Uuid;

use crate::error::EngineError;
use crate::fret_state::{can_note_be_hit, highest_bit};
use crate::gates::{FlagOracle, OverrideGates};
use crate::input::{self, GameInput, InputFlags};
use crate::note::{normalize_open_bit, Note};
use crate::params::EngineParameters;
use crate::policy::InstrumentPolicy;
use crate::sink::EventSink;
use crate::sustain::SustainSet;
use crate::timers::{TimerKind, TimerSet};

/// Per-note mutable flags, owned by the engine and indexed in parallel with
/// the (otherwise immutable) chart rather than mutating chart objects.
#[derive(Debug, Clone, Copy, Default)]
struct NoteFlags {
    was_hit: bool,
    was_missed: bool,
}

impl NoteFlags {
    fn dealt_with(&self) -> bool {
        self.was_hit || self.was_missed
    }
}

/// Owned, per-tick-exclusive engine state.
#[derive(Debug, Clone)]
struct EngineState {
    note_index: usize,
    current_time: f64,
    current_tick: u32,
    flags: InputFlags,
    timers: TimerSet,
    active_sustains: SustainSet,
    re_run_hit_logic: bool,
    last_reported_star_power: bool,
}

impl EngineState {
    fn new() -> Self {
        Self {
            note_index: 0,
            current_time: f64::NEG_INFINITY,
            current_tick: 0,
            flags: InputFlags::new(),
            timers: TimerSet::new(),
            active_sustains: SustainSet::new(),
            re_run_hit_logic: false,
            last_reported_star_power: false,
        }
    }
}

/// The cap on same-tick re-entry passes.
const MAX_RERUN_ITERATIONS: u32 = 16;

/// The core hit-detection state machine. One `HitEngine` per play session;
/// reconstruct for a new session rather than resetting in place.
pub struct HitEngine {
    notes: Vec<Note>,
    note_flags: Vec<NoteFlags>,
    state: EngineState,
    params: EngineParameters,
    gates: OverrideGates,
    policy: InstrumentPolicy,
    combo: u32,
    is_bot: bool,
}

impl HitEngine {
    pub fn new(notes: Vec<Note>, params: EngineParameters, profile_id: Uuid) -> Self {
        let note_flags = vec![NoteFlags::default(); notes.len()];
        Self {
            notes,
            note_flags,
            state: EngineState::new(),
            params,
            gates: OverrideGates::new(profile_id),
            policy: InstrumentPolicy::FiveFret,
            combo: 0,
            is_bot: false,
        }
    }

    /// Enables bot simulation mode. Only five-fret's ideal fret synthesis
    /// is implemented; other policies are out of scope.
    pub fn with_bot(mut self, is_bot: bool) -> Self {
        self.is_bot = is_bot;
        self
    }

    pub fn policy(&self) -> InstrumentPolicy {
        self.policy
    }

    pub fn note_index(&self) -> usize {
        self.state.note_index
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn button_mask(&self) -> u8 {
        self.state.flags.button_mask
    }

    pub fn was_hit(&self, index: usize) -> bool {
        self.note_flags[index].was_hit
    }

    pub fn was_missed(&self, index: usize) -> bool {
        self.note_flags[index].was_missed
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Folds one `GameInput` into engine state. Every input with a stamp
    /// `<= currentTime` must be applied before the corresponding `tick`.
    pub fn apply_input(&mut self, input: GameInput, oracle: &dyn FlagOracle) {
        let auto_play = self.gates.is_auto_play_active(oracle);
        let auto_strum = self.gates.is_auto_strum_active(oracle);
        input::apply(
            input,
            &mut self.state.flags,
            &mut self.state.timers,
            auto_play,
            auto_strum,
        );
    }

    /// Advances the engine to `current_time`/`current_tick`, looping the
    /// A–H step sequence until `ReRunHitLogic` stays false for a full pass
    /// (capped at `MAX_RERUN_ITERATIONS`).
    pub fn tick(
        &mut self,
        current_time: f64,
        current_tick: u32,
        sink: &mut dyn EventSink,
        oracle: &dyn FlagOracle,
    ) -> Result<(), EngineError> {
        if current_time < self.state.current_time {
            return Err(EngineError::TicksOutOfOrder {
                previous: self.state.current_time,
                given: current_time,
            });
        }
        if self.state.note_index > self.notes.len() {
            return Err(EngineError::NoteIndexOutOfRange {
                index: self.state.note_index,
                len: self.notes.len(),
            });
        }

        self.state.current_time = current_time;
        self.state.current_tick = current_tick;

        let auto_play = self.gates.is_auto_play_active(oracle);
        let auto_strum = self.gates.is_auto_strum_active(oracle);

        let mut iterations = 0u32;
        loop {
            self.run_frame(auto_play, auto_strum, sink);
            iterations += 1;
            if !self.state.re_run_hit_logic || iterations >= MAX_RERUN_ITERATIONS {
                break;
            }
        }
        if self.state.re_run_hit_logic {
            log::warn!(
                "hit engine re-run cap of {MAX_RERUN_ITERATIONS} iterations exceeded at t={current_time:.4}"
            );
            self.state.re_run_hit_logic = false;
        }
        Ok(())
    }

    fn run_frame(&mut self, auto_play: bool, auto_strum: bool, sink: &mut dyn EventSink) {
        self.state.re_run_hit_logic = false;

        // Step A
        self.update_star_power_state(sink);
        self.update_timers(auto_play, auto_strum, sink);

        if auto_play {
            // Step B
            self.state.flags.has_strummed = false;
            self.state.flags.has_fretted = false;
            self.state.flags.has_tapped = false;
            self.state.flags.is_fret_press = false;
            self.state.flags.was_note_ghosted = false;
        } else {
            // Step C
            self.handle_strum_edge(auto_strum, sink);
            // Step D
            if self.is_bot {
                self.simulate_bot_input();
            }
            // Step E
            self.ghost_check(sink);
        }

        // Step F
        self.hit_scan(auto_play, auto_strum, sink);

        // Step G
        self.update_sustains(auto_play, sink);

        // Step H
        if !auto_play {
            self.state.flags.has_strummed = false;
            self.state.flags.has_fretted = false;
            self.state.flags.is_fret_press = false;
        }
    }

    /// Reports star power activation edges via `EventSink`. The underlying
    /// scoring/multiplier math this gates is an abstract side effect the
    /// host owns; the engine only observes the whammy-driven flag
    /// `InputReducer` maintains and reports transitions.
    fn update_star_power_state(&mut self, sink: &mut dyn EventSink) {
        let active = self.state.flags.is_star_power_input_active;
        if active != self.state.last_reported_star_power {
            self.state.last_reported_star_power = active;
            sink.on_star_power_state_change(active);
        }
    }

    fn update_timers(&mut self, auto_play: bool, auto_strum: bool, sink: &mut dyn EventSink) {
        let now = self.state.current_time;

        if self.state.timers.is_active(TimerKind::HopoLeniency)
            && self.state.timers.is_expired(TimerKind::HopoLeniency, now)
            && !auto_play
        {
            self.state.timers.disable(TimerKind::HopoLeniency);
            self.state.re_run_hit_logic = true;
        }

        if self.state.timers.is_active(TimerKind::StrumLeniency)
            && self.state.timers.is_expired(TimerKind::StrumLeniency, now)
        {
            if !auto_play && !auto_strum {
                self.overstrum(sink);
            }
            self.state.timers.disable(TimerKind::StrumLeniency);
            self.state.re_run_hit_logic = true;
        }
    }

    fn handle_strum_edge(&mut self, auto_strum: bool, sink: &mut dyn EventSink) {
        if auto_strum || !self.state.flags.has_strummed {
            return;
        }

        if self.state.timers.is_active(TimerKind::HopoLeniency) {
            // Strum eaten by HOPO.
            self.state.timers.disable(TimerKind::HopoLeniency);
            self.state.timers.disable(TimerKind::StrumLeniency);
            self.state.re_run_hit_logic = true;
            return;
        }

        if self.state.timers.is_active(TimerKind::StrumLeniency) {
            self.overstrum(sink);
            self.state.timers.disable(TimerKind::StrumLeniency);
            self.state.re_run_hit_logic = true;
            return;
        }

        let offset = self.strum_leniency_offset();
        self.state
            .timers
            .start(TimerKind::StrumLeniency, self.state.current_time, offset);
        self.state.re_run_hit_logic = true;
    }

    /// Chooses the StrumLeniency timer's duration: the reduced
    /// `StrumLeniencySmall` if the current note's window has already
    /// closed (or none remain), otherwise the full `StrumLeniency`.
    fn strum_leniency_offset(&self) -> f64 {
        match self.notes.get(self.state.note_index) {
            Some(note) => {
                let back_end_abs = note.time + self.params.hit_window.back_end();
                if self.state.current_time > back_end_abs {
                    self.params.strum_leniency_small_seconds
                } else {
                    self.params.strum_leniency_seconds
                }
            }
            None => self.params.strum_leniency_small_seconds,
        }
    }

    fn simulate_bot_input(&mut self) {
        let Some(&note) = self.notes.get(self.state.note_index) else {
            return;
        };
        if self.state.current_time < note.time {
            return;
        }
        let extended = self.state.active_sustains.extended_sustain_frets();
        let ideal_mask = normalize_open_bit(note.required_frets() | extended);

        self.state.flags.last_button_mask = self.state.flags.button_mask;
        self.state.flags.has_tapped = ideal_mask != self.state.flags.button_mask;
        self.state.flags.button_mask = ideal_mask;
        self.state.flags.is_fret_press = true;
    }

    fn ghost_check(&mut self, sink: &mut dyn EventSink) {
        if !self.state.flags.has_fretted || !self.params.anti_ghosting {
            return;
        }
        let Some(&note) = self.notes.get(self.state.note_index) else {
            return;
        };
        let back_end_abs = note.time + self.params.hit_window.back_end();
        if self.state.current_time > back_end_abs {
            return;
        }

        self.state.flags.has_tapped = true;
        let front_end_magnitude = self.params.hit_window.front_end().abs();
        self.state.timers.start(
            TimerKind::FrontEndExpire,
            self.state.current_time,
            front_end_magnitude,
        );

        let required = note.required_frets();
        let held_frets = self.state.flags.button_mask & crate::note::FRET_BITS_MASK;
        let last_frets = self.state.flags.last_button_mask & crate::note::FRET_BITS_MASK;
        let upward_motion =
            self.state.flags.is_fret_press && highest_bit(held_frets) > highest_bit(last_frets);
        let incomplete = held_frets & required != required;

        if upward_motion && incomplete {
            self.state.flags.was_note_ghosted = true;
            sink.on_ghost_input();
        }
    }

    fn hit_scan(&mut self, auto_play: bool, auto_strum: bool, sink: &mut dyn EventSink) {
        let head = self.state.note_index;
        let mut i = head;

        while i < self.notes.len() {
            if self.note_flags[i].dealt_with() {
                i += 1;
                continue;
            }

            let note = self.notes[i];
            let (in_window, missed) = self.is_note_in_window(&note);

            if i == head {
                if missed {
                    self.miss_note(i, sink);
                    return;
                }
                if !in_window {
                    return;
                }
            } else if !in_window {
                i += 1;
                continue;
            }

            if auto_play {
                self.hit_note(i, true, sink);
                return;
            }

            let extended = self.state.active_sustains.extended_sustain_frets();
            if !can_note_be_hit(&note, self.state.flags.button_mask, extended) {
                if i == head {
                    return;
                }
                i += 1;
                continue;
            }

            let hopo_hit = note.is_hopo && (self.combo > 0 || head == 0);
            let tap_hit = note.is_tap;
            let front_end_valid = self.front_end_valid(head);

            if self.state.flags.has_tapped
                && (hopo_hit || tap_hit)
                && front_end_valid
                && !self.state.flags.was_note_ghosted
            {
                self.hit_note(i, false, sink);
                return;
            }

            let strum_satisfied = (!auto_strum
                && (self.state.flags.has_strummed
                    || self.state.timers.is_active(TimerKind::StrumLeniency)))
                || auto_strum;

            if i == head && strum_satisfied {
                self.hit_note(i, false, sink);
                return;
            }
            if i == head {
                return;
            }
            i += 1;
        }
    }

    fn front_end_valid(&self, head: usize) -> bool {
        if self.params.infinite_front_end || head == 0 {
            return true;
        }
        if !self.state.timers.is_active(TimerKind::FrontEndExpire) {
            return true;
        }
        match self.state.timers.get(TimerKind::FrontEndExpire).end_time() {
            Some(end) => self.state.current_time <= end,
            None => true,
        }
    }

    fn is_note_in_window(&self, note: &Note) -> (bool, bool) {
        let front = note.time + self.params.hit_window.front_end();
        let back = note.time + self.params.hit_window.back_end();
        let now = self.state.current_time;
        if now > back {
            return (false, true);
        }
        (now >= front, false)
    }

    fn hit_note(&mut self, idx: usize, auto_play: bool, sink: &mut dyn EventSink) {
        let note = self.notes[idx];

        if !auto_play {
            if note.is_hopo || note.is_tap {
                self.state.flags.has_tapped = false;
                self.state.timers.start(
                    TimerKind::HopoLeniency,
                    self.state.current_time,
                    self.params.hopo_leniency_seconds,
                );
            } else {
                self.state.timers.disable(TimerKind::FrontEndExpire);
            }
            self.state.timers.disable(TimerKind::StrumLeniency);
        } else {
            self.state.timers.disable(TimerKind::HopoLeniency);
            self.state.timers.disable(TimerKind::StrumLeniency);
            self.state.timers.disable(TimerKind::FrontEndExpire);
            self.state.flags.has_tapped = false;
        }

        // The frets actually in play for this hit — the note's own required
        // bits plus any anchor frets held alongside it — so a sustain being
        // used as an anchor for the new chord ends here even though its own
        // fret bit isn't part of `note`'s mask.
        let hit_frets = self.state.flags.button_mask & crate::note::FRET_BITS_MASK;
        let ended = self
            .state
            .active_sustains
            .end_intersecting(hit_frets, self.state.current_tick);
        for (sustain, completed) in ended {
            sink.on_sustain_end(&sustain.note, completed);
        }

        self.note_flags[idx].was_hit = true;
        sink.on_note_hit(&note);

        self.combo += 1;
        sink.on_combo_change(self.combo);

        if note.has_sustain() {
            self.state.active_sustains.start(idx, note);
            sink.on_sustain_start(&note);
        }

        self.state.note_index = idx + 1;
        self.state.re_run_hit_logic = true;
    }

    fn miss_note(&mut self, idx: usize, sink: &mut dyn EventSink) {
        let note = self.notes[idx];

        self.state.flags.has_tapped = false;
        self.state.timers.disable(TimerKind::HopoLeniency);
        self.state.timers.disable(TimerKind::StrumLeniency);
        self.state.flags.was_note_ghosted = false;
        self.state.timers.disable(TimerKind::FrontEndExpire);

        self.note_flags[idx].was_missed = true;
        sink.on_note_missed(&note);

        self.combo = 0;
        sink.on_combo_change(0);

        self.state.note_index = idx + 1;
        self.state.re_run_hit_logic = true;
    }

    fn update_sustains(&mut self, auto_play: bool, sink: &mut dyn EventSink) {
        let ended = self.state.active_sustains.update(
            self.state.current_tick,
            self.state.flags.button_mask,
            auto_play,
        );
        for (sustain, completed) in ended {
            sink.on_sustain_end(&sustain.note, completed);
        }
    }

    fn overstrum(&mut self, sink: &mut dyn EventSink) {
        self.combo = 0;
        sink.on_overstrum();
        sink.on_combo_change(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::NoOverridesOracle;
    use crate::input::InputAction;
    use crate::sink::RecordingSink;

    fn note(time: f64, mask: u8) -> Note {
        Note {
            time,
            tick: (time * 100.0).round() as u32,
            tick_end: 0,
            note_mask: mask,
            disjoint_mask: 0,
            is_hopo: false,
            is_tap: false,
            is_chord: mask.count_ones() > 1,
            is_disjoint: false,
            is_extended_sustain: false,
            previous_note: None,
        }
    }

    #[test]
    fn ticks_out_of_order_is_a_diagnostic_error() {
        let mut engine = HitEngine::new(vec![note(1.0, crate::note::GREEN)], EngineParameters::default(), Uuid::nil());
        let mut sink = RecordingSink::new();
        let oracle = NoOverridesOracle;
        engine.tick(1.0, 100, &mut sink, &oracle).unwrap();
        let err = engine.tick(0.5, 50, &mut sink, &oracle).unwrap_err();
        assert_eq!(
            err,
            EngineError::TicksOutOfOrder {
                previous: 1.0,
                given: 0.5,
            }
        );
    }

    #[test]
    fn star_power_activation_is_reported_once() {
        let mut engine = HitEngine::new(vec![note(1.0, crate::note::GREEN)], EngineParameters::default(), Uuid::nil());
        let mut sink = RecordingSink::new();
        let oracle = NoOverridesOracle;

        engine.apply_input(
            GameInput {
                time: 0.0,
                action: InputAction::StarPower { active: true },
            },
            &oracle,
        );
        engine.tick(0.0, 0, &mut sink, &oracle).unwrap();
        engine.tick(0.01, 1, &mut sink, &oracle).unwrap();

        assert_eq!(sink.star_power_changes, vec![true]);
    }
}
