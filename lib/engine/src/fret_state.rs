//! Bit-masked chord matching with anchoring.

use crate::note::{Note, FRET_BITS_MASK, OPEN_BIT};

/// Highest set bit's value, or 0 if `mask` is empty.
pub(crate) fn highest_bit(mask: u8) -> u8 {
    if mask == 0 {
        0
    } else {
        1 << (7 - mask.leading_zeros())
    }
}

/// Lowest set bit's value, or 0 if `mask` is empty.
fn lowest_bit(mask: u8) -> u8 {
    mask & mask.wrapping_neg()
}

/// Decides if `note` can be hit given `buttons_held`, ignoring timing
/// entirely. `buttons_held` must already have its OPEN bit
/// normalized (see `note::normalize_open_bit`).
pub fn can_hit_with_mask(note: &Note, buttons_held: u8) -> bool {
    let required = note.required_frets();

    if note.is_open() {
        // Open-only note: hittable iff no frets are held.
        return buttons_held & FRET_BITS_MASK == 0;
    }

    if note.note_mask & OPEN_BIT != 0 {
        // OPEN plus frets: all required frets held, and any extra held
        // frets must be strictly above the chord's lowest required fret.
        let held_frets = buttons_held & FRET_BITS_MASK;
        if held_frets & required != required {
            return false;
        }
        let anchor_bits = held_frets & !required;
        anchor_bits == 0 || lowest_bit(anchor_bits) > lowest_bit(required)
    } else {
        // Pure fret note: required bits must be a subset of held bits.
        let held_frets = buttons_held & FRET_BITS_MASK;
        if held_frets == required {
            return true;
        }
        if held_frets & required != required {
            return false;
        }
        // held is a strict superset of required: the extra ("anchor") bits
        // must all be below the chord's lowest required fret.
        let anchor_bits = held_frets ^ required;
        highest_bit(anchor_bits) < lowest_bit(required)
    }
}

/// `CanNoteBeHit`: tries the raw mask, then the mask with every
/// currently extended-and-actively-held sustain's fret bits removed, so
/// frets held only to sustain a previous note don't block the next hit.
pub fn can_note_be_hit(note: &Note, buttons_held: u8, extended_sustain_frets: u8) -> bool {
    if can_hit_with_mask(note, buttons_held) {
        return true;
    }
    if extended_sustain_frets == 0 {
        return false;
    }
    let without_sustained = buttons_held & !extended_sustain_frets;
    can_hit_with_mask(note, without_sustained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::*;

    fn note(mask: u8) -> Note {
        Note {
            time: 0.0,
            tick: 0,
            tick_end: 0,
            note_mask: mask,
            disjoint_mask: 0,
            is_hopo: false,
            is_tap: false,
            is_chord: false,
            is_disjoint: false,
            is_extended_sustain: false,
            previous_note: None,
        }
    }

    #[test]
    fn open_note_requires_no_frets_held() {
        let n = note(OPEN_BIT);
        assert!(can_hit_with_mask(&n, OPEN_BIT));
        assert!(!can_hit_with_mask(&n, GREEN));
    }

    #[test]
    fn pure_fret_chord_exact_match() {
        let n = note(GREEN | RED);
        assert!(can_hit_with_mask(&n, GREEN | RED));
    }

    #[test]
    fn pure_fret_chord_allows_lower_anchor() {
        // Chord is RED+YELLOW; GREEN held below it is a legal anchor.
        let n = note(RED | YELLOW);
        assert!(can_hit_with_mask(&n, GREEN | RED | YELLOW));
    }

    #[test]
    fn pure_fret_chord_rejects_higher_anchor() {
        // BLUE held above the RED+YELLOW chord is not a legal anchor.
        let n = note(RED | YELLOW);
        assert!(!can_hit_with_mask(&n, RED | YELLOW | BLUE));
    }

    #[test]
    fn open_plus_frets_requires_anchor_above_lowest_required() {
        let n = note(OPEN_BIT | RED);
        assert!(can_hit_with_mask(&n, RED | YELLOW));
        assert!(!can_hit_with_mask(&n, RED | GREEN));
    }

    #[test]
    fn sustain_bits_removed_unblock_next_hit() {
        // Holding GREEN only because it's sustaining; next note is RED alone.
        let n = note(RED);
        assert!(!can_hit_with_mask(&n, GREEN | RED));
        assert!(can_note_be_hit(&n, GREEN | RED, GREEN));
    }
}
