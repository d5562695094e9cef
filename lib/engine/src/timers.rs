//! Named countdown timers used throughout the hit resolver.

use std::fmt;

/// The five timers the resolver drives. Each is an independent countdown;
/// `TimerSet` just gives them names so the resolver can address them by
/// role instead of threading five separate `Option<f64>` fields around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    StrumLeniency,
    HopoLeniency,
    StarPowerWhammy,
    ChordStagger,
    FrontEndExpire,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKind::StrumLeniency => "StrumLeniency",
            TimerKind::HopoLeniency => "HopoLeniency",
            TimerKind::StarPowerWhammy => "StarPowerWhammy",
            TimerKind::ChordStagger => "ChordStagger",
            TimerKind::FrontEndExpire => "FrontEndExpire",
        };
        f.write_str(name)
    }
}

/// A single countdown timer with an absolute end time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    end_time: Option<f64>,
}

impl Timer {
    pub const fn new() -> Self {
        Self { end_time: None }
    }

    /// Starts the timer so it expires `offset_seconds` after `now`.
    /// An offset of `0.0` gives full leniency starting right now.
    pub fn start(&mut self, now: f64, offset_seconds: f64) {
        self.end_time = Some(now + offset_seconds);
    }

    pub fn disable(&mut self) {
        self.end_time = None;
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn is_expired(&self, now: f64) -> bool {
        matches!(self.end_time, Some(end) if now >= end)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }
}

/// The full set of named timers, indexed by `TimerKind`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerSet {
    strum_leniency: Timer,
    hopo_leniency: Timer,
    star_power_whammy: Timer,
    chord_stagger: Timer,
    front_end_expire: Timer,
}

impl TimerSet {
    pub const fn new() -> Self {
        Self {
            strum_leniency: Timer::new(),
            hopo_leniency: Timer::new(),
            star_power_whammy: Timer::new(),
            chord_stagger: Timer::new(),
            front_end_expire: Timer::new(),
        }
    }

    pub fn get(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::StrumLeniency => &self.strum_leniency,
            TimerKind::HopoLeniency => &self.hopo_leniency,
            TimerKind::StarPowerWhammy => &self.star_power_whammy,
            TimerKind::ChordStagger => &self.chord_stagger,
            TimerKind::FrontEndExpire => &self.front_end_expire,
        }
    }

    pub fn get_mut(&mut self, kind: TimerKind) -> &mut Timer {
        match kind {
            TimerKind::StrumLeniency => &mut self.strum_leniency,
            TimerKind::HopoLeniency => &mut self.hopo_leniency,
            TimerKind::StarPowerWhammy => &mut self.star_power_whammy,
            TimerKind::ChordStagger => &mut self.chord_stagger,
            TimerKind::FrontEndExpire => &mut self.front_end_expire,
        }
    }

    pub fn start(&mut self, kind: TimerKind, now: f64, offset_seconds: f64) {
        self.get_mut(kind).start(now, offset_seconds);
    }

    pub fn disable(&mut self, kind: TimerKind) {
        self.get_mut(kind).disable();
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.get(kind).is_active()
    }

    pub fn is_expired(&self, kind: TimerKind, now: f64) -> bool {
        self.get(kind).is_expired(now)
    }
}
