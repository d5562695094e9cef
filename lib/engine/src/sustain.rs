//! Active sustains: leniency-held → held → ended.

use crate::note::Note;

/// One currently-held sustain, referencing the note it came from by index
/// into the chart rather than owning a copy.
#[derive(Debug, Clone, Copy)]
pub struct Sustain {
    pub note_index: usize,
    pub note: Note,
    /// True while the sustain is within its hit leniency grace period
    /// rather than genuinely held by the player.
    pub is_leniency_held: bool,
}

/// Ordered collection of active sustains; insertion order is hit order.
#[derive(Debug, Clone, Default)]
pub struct SustainSet {
    active: Vec<Sustain>,
}

impl SustainSet {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sustain> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn start(&mut self, note_index: usize, note: Note) {
        self.active.push(Sustain {
            note_index,
            note,
            is_leniency_held: true,
        });
    }

    /// Fret bits (ignoring OPEN) currently held by extended-sustain notes —
    /// used to unblock `CanNoteBeHit` for the next chord.
    pub fn extended_sustain_frets(&self) -> u8 {
        self.active
            .iter()
            .filter(|s| s.note.is_extended_sustain)
            .fold(0u8, |mask, s| mask | s.note.sustain_frets())
    }

    /// Ends any active sustain whose fret bits intersect `hit_frets`
    /// (ignoring OPEN) — called when a new note is hit. Returns the ended
    /// sustains so the caller can report completion via `EventSink`.
    pub fn end_intersecting(&mut self, hit_frets: u8, current_tick: u32) -> Vec<(Sustain, bool)> {
        let mut ended = Vec::new();
        self.active.retain(|s| {
            if s.note.sustain_frets() & hit_frets != 0 {
                let completed = current_tick >= s.note.tick_end;
                ended.push((*s, completed));
                false
            } else {
                true
            }
        });
        ended
    }

    /// Ends sustains whose tick has passed or that are no longer held. A
    /// sustain just started is given one tick of grace before its hold is
    /// checked, so the frets used to hit a disjoint chord don't immediately
    /// end the sustain before its own (possibly different) frets are
    /// pressed. Held-check is bypassed entirely when `bypass_hold_check`
    /// (AutoPlay) is set.
    pub fn update(
        &mut self,
        current_tick: u32,
        button_mask: u8,
        bypass_hold_check: bool,
    ) -> Vec<(Sustain, bool)> {
        let mut ended = Vec::new();
        self.active.retain_mut(|s| {
            if current_tick >= s.note.tick_end {
                ended.push((*s, true));
                return false;
            }
            if s.is_leniency_held {
                // Grace period: the tick a sustain starts on, the frets that
                // hold it (its disjoint_mask, when disjoint) may not be
                // pressed yet even though the note was legitimately hit via
                // a different chord shape. Skip the hold check just this
                // once rather than ending the sustain before it began.
                s.is_leniency_held = false;
                return true;
            }
            if !bypass_hold_check {
                let required = s.note.sustain_frets();
                let held = required != 0 && (button_mask & required) == required;
                if !held {
                    ended.push((*s, false));
                    return false;
                }
            }
            true
        });
        ended
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{GREEN, RED};

    fn note(mask: u8, tick_end: u32, extended: bool) -> Note {
        Note {
            time: 0.0,
            tick: 0,
            tick_end,
            note_mask: mask,
            disjoint_mask: 0,
            is_hopo: false,
            is_tap: false,
            is_chord: false,
            is_disjoint: false,
            is_extended_sustain: extended,
            previous_note: None,
        }
    }

    fn disjoint_note(mask: u8, disjoint_mask: u8, tick_end: u32) -> Note {
        Note {
            time: 0.0,
            tick: 0,
            tick_end,
            note_mask: mask,
            disjoint_mask,
            is_hopo: false,
            is_tap: false,
            is_chord: mask.count_ones() > 1,
            is_disjoint: true,
            is_extended_sustain: false,
            previous_note: None,
        }
    }

    #[test]
    fn extended_sustain_frets_aggregates_only_extended() {
        let mut set = SustainSet::new();
        set.start(0, note(GREEN, 100, true));
        set.start(1, note(RED, 100, false));
        assert_eq!(set.extended_sustain_frets(), GREEN);
    }

    #[test]
    fn update_ends_on_tick_end_or_release() {
        let mut set = SustainSet::new();
        set.start(0, note(GREEN, 50, true));
        let ended = set.update(10, GREEN, false);
        assert!(ended.is_empty());
        let ended = set.update(10, 0, false);
        assert_eq!(ended.len(), 1);
        assert!(!ended[0].1);
    }

    #[test]
    fn leniency_grace_period_protects_disjoint_sustain_on_first_update() {
        use crate::note::YELLOW;

        let mut set = SustainSet::new();
        // Disjoint note: hit via the full chord shape, but sustained on
        // YELLOW alone.
        set.start(0, disjoint_note(GREEN | RED | YELLOW, YELLOW, 100));

        // Same tick as the hit: the player is still holding the chord shape
        // used to strum it, not yet isolated onto YELLOW. Without the grace
        // period this would end the sustain immediately.
        let ended = set.update(10, GREEN | RED, false);
        assert!(ended.is_empty());

        // Next tick: player settles onto the sustain's own fret.
        let ended = set.update(20, YELLOW, false);
        assert!(ended.is_empty());

        // Releases before tick_end: sustain ends, incomplete.
        let ended = set.update(30, 0, false);
        assert_eq!(ended.len(), 1);
        assert!(!ended[0].1);
    }

    #[test]
    fn update_completes_when_tick_end_reached() {
        let mut set = SustainSet::new();
        set.start(0, note(GREEN, 50, true));
        let ended = set.update(60, GREEN, false);
        assert_eq!(ended.len(), 1);
        assert!(ended[0].1);
    }
}
