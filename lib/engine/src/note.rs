//! Chart-provided note data and the five-fret bit masks.

/// Number of playable frets (green, red, yellow, blue, orange).
pub const NUM_FRETS: usize = 5;

/// Synthetic bit meaning "no fret pressed" — the hit target for open notes.
pub const OPEN_BIT: u8 = 1 << NUM_FRETS;

/// Mask of all five fret bits (bits 0..=4).
pub const FRET_BITS_MASK: u8 = (1 << NUM_FRETS) - 1;

/// Bit index of a single fret, lowest (green) to highest (orange).
pub const GREEN: u8 = 1 << 0;
pub const RED: u8 = 1 << 1;
pub const YELLOW: u8 = 1 << 2;
pub const BLUE: u8 = 1 << 3;
pub const ORANGE: u8 = 1 << 4;

/// Returns `true` if `mask` has no fret bits set (open or empty).
pub fn has_no_frets(mask: u8) -> bool {
    mask & FRET_BITS_MASK == 0
}

/// Re-derives the OPEN bit from the fret bits: set iff no frets are held.
pub fn normalize_open_bit(mask: u8) -> u8 {
    let frets = mask & FRET_BITS_MASK;
    if frets == 0 {
        frets | OPEN_BIT
    } else {
        frets
    }
}

/// A single chart-authored note. Immutable once loaded; the engine tracks
/// `wasHit`/`wasMissed` in a parallel array rather than mutating this struct
/// (see `EngineState::note_flags`), so `Note` itself carries no mutable state.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Note {
    /// Absolute time in seconds.
    pub time: f64,
    /// Tick on the beat grid.
    pub tick: u32,
    /// Tick at which any sustain on this note ends.
    pub tick_end: u32,
    /// Five fret bits plus the synthetic OPEN bit.
    pub note_mask: u8,
    /// Subset of `note_mask` used for sustain-holding when `is_disjoint`.
    pub disjoint_mask: u8,
    pub is_hopo: bool,
    pub is_tap: bool,
    pub is_chord: bool,
    pub is_disjoint: bool,
    pub is_extended_sustain: bool,
    /// Index of the previous note in the chart, or `None` for the first note.
    /// Modeled as an index rather than an owning back-reference to avoid
    /// cycles and keep `Note` plain data.
    pub previous_note: Option<usize>,
}

impl Note {
    /// Fret bits required to hit this note (mask minus the OPEN bit).
    pub fn required_frets(&self) -> u8 {
        self.note_mask & FRET_BITS_MASK
    }

    pub fn is_open(&self) -> bool {
        self.note_mask & OPEN_BIT != 0 && self.required_frets() == 0
    }

    /// Fret bits a sustain on this note actually holds: the disjoint mask
    /// when disjoint, otherwise the full note mask's fret bits.
    pub fn sustain_frets(&self) -> u8 {
        if self.is_disjoint {
            self.disjoint_mask & FRET_BITS_MASK
        } else {
            self.required_frets()
        }
    }

    pub fn has_sustain(&self) -> bool {
        self.tick_end > self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_bit_set_iff_no_frets() {
        assert_eq!(normalize_open_bit(0), OPEN_BIT);
        assert_eq!(normalize_open_bit(GREEN), GREEN);
        assert_eq!(normalize_open_bit(GREEN | RED), GREEN | RED);
    }

    #[test]
    fn required_frets_excludes_open_bit() {
        let n = Note {
            time: 0.0,
            tick: 0,
            tick_end: 0,
            note_mask: GREEN | OPEN_BIT,
            disjoint_mask: 0,
            is_hopo: false,
            is_tap: false,
            is_chord: false,
            is_disjoint: false,
            is_extended_sustain: false,
            previous_note: None,
        };
        assert_eq!(n.required_frets(), GREEN);
    }
}
