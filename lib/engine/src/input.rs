//! Folds raw `GameInput` events into engine state flags.

use crate::note::{normalize_open_bit, NUM_FRETS};
use crate::timers::{TimerKind, TimerSet};

/// A single fret, addressed by index (0 = green .. 4 = orange).
pub type FretIndex = u8;

/// One input event as delivered by the frame driver, already quantized to a
/// timestamp. Inputs with stamps `<= currentTime` must all be folded in via
/// `InputReducer::apply` before the corresponding `HitEngine::tick` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameInput {
    pub time: f64,
    pub action: InputAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Fret { index: FretIndex, pressed: bool },
    StrumDown { pressed: bool },
    StrumUp { pressed: bool },
    StarPower { active: bool },
    Whammy { pressed: bool },
}

/// The per-frame action flags and button masks InputReducer maintains.
/// Owned by `EngineState`; `InputReducer::apply` mutates it in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFlags {
    pub button_mask: u8,
    pub last_button_mask: u8,
    pub has_strummed: bool,
    pub has_fretted: bool,
    pub has_tapped: bool,
    pub is_fret_press: bool,
    pub was_note_ghosted: bool,
    pub is_star_power_input_active: bool,
}

impl InputFlags {
    pub fn new() -> Self {
        let mut flags = Self::default();
        flags.button_mask = normalize_open_bit(0);
        flags.last_button_mask = flags.button_mask;
        flags
    }
}

/// Folds one `GameInput` into `flags` and `timers`.
///
/// `auto_play` and `auto_strum` are the current `OverrideGates` readings;
/// strum/fret edges are suppressed differently depending on which is
/// active.
pub fn apply(
    input: GameInput,
    flags: &mut InputFlags,
    timers: &mut TimerSet,
    auto_play: bool,
    auto_strum: bool,
) {
    match input.action {
        InputAction::StarPower { active } => {
            flags.is_star_power_input_active = active;
        }
        InputAction::Whammy { pressed } => {
            if pressed {
                timers.start(TimerKind::StarPowerWhammy, input.time, 0.0);
            }
        }
        InputAction::Fret { index, pressed } => {
            apply_fret(index, pressed, flags, auto_play);
        }
        InputAction::StrumDown { pressed } | InputAction::StrumUp { pressed } => {
            if pressed && !auto_play && !auto_strum {
                flags.has_strummed = true;
            }
        }
    }
}

fn apply_fret(index: FretIndex, pressed: bool, flags: &mut InputFlags, auto_play: bool) {
    debug_assert!((index as usize) < NUM_FRETS, "fret index out of range");

    if !auto_play {
        flags.last_button_mask = flags.button_mask;
    }

    let bit = 1u8 << index;
    let frets = if pressed {
        (flags.button_mask | bit) & crate::note::FRET_BITS_MASK
    } else {
        (flags.button_mask & !bit) & crate::note::FRET_BITS_MASK
    };
    flags.button_mask = normalize_open_bit(frets);

    if !auto_play {
        flags.has_fretted = true;
        flags.is_fret_press = pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{GREEN, OPEN_BIT, RED};

    #[test]
    fn fret_press_sets_bit_and_clears_open() {
        let mut flags = InputFlags::new();
        let mut timers = TimerSet::new();
        assert_eq!(flags.button_mask, OPEN_BIT);

        apply(
            GameInput {
                time: 0.0,
                action: InputAction::Fret {
                    index: 0,
                    pressed: true,
                },
            },
            &mut flags,
            &mut timers,
            false,
            false,
        );

        assert_eq!(flags.button_mask, GREEN);
        assert!(flags.has_fretted);
        assert!(flags.is_fret_press);
    }

    #[test]
    fn releasing_all_frets_restores_open_bit() {
        let mut flags = InputFlags::new();
        let mut timers = TimerSet::new();
        apply(
            GameInput {
                time: 0.0,
                action: InputAction::Fret {
                    index: 1,
                    pressed: true,
                },
            },
            &mut flags,
            &mut timers,
            false,
            false,
        );
        apply(
            GameInput {
                time: 0.0,
                action: InputAction::Fret {
                    index: 1,
                    pressed: false,
                },
            },
            &mut flags,
            &mut timers,
            false,
            false,
        );
        assert_eq!(flags.button_mask, OPEN_BIT);
    }

    #[test]
    fn strum_suppressed_under_autostrum_or_autoplay() {
        let mut flags = InputFlags::new();
        let mut timers = TimerSet::new();
        apply(
            GameInput {
                time: 0.0,
                action: InputAction::StrumDown { pressed: true },
            },
            &mut flags,
            &mut timers,
            false,
            true,
        );
        assert!(!flags.has_strummed);

        apply(
            GameInput {
                time: 0.0,
                action: InputAction::StrumDown { pressed: true },
            },
            &mut flags,
            &mut timers,
            false,
            false,
        );
        assert!(flags.has_strummed);
        let _ = RED;
    }
}
