//! A generic monotonic cursor into an ordered event list.
//!
//! `EventCursor` borrows its event list rather than owning it, and never
//! allocates after construction. It's shared by the note-hit loop and,
//! supplementally, by a tick/time `SyncTrack` cursor (see `sync`).

/// Cursor position: either "before the first event" or "at event index i".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeStart,
    At(usize),
}

pub struct EventCursor<'a, T> {
    events: &'a [T],
    position: Position,
    key_of: fn(&T) -> f64,
}

impl<'a, T> EventCursor<'a, T> {
    /// `key_of` extracts the comparison key (tick or time, as `f64`) from an
    /// event. Using a projection function instead of requiring `T: Ord`
    /// lets the same cursor type serve both tick-keyed and time-keyed lists.
    pub fn new(events: &'a [T], key_of: fn(&T) -> f64) -> Self {
        Self {
            events,
            position: Position::BeforeStart,
            key_of,
        }
    }

    /// The event at the cursor, or `None` if the cursor is before the first
    /// event.
    pub fn current(&self) -> Option<&'a T> {
        match self.position {
            Position::BeforeStart => None,
            Position::At(i) => Some(&self.events[i]),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.position {
            Position::BeforeStart => None,
            Position::At(i) => Some(i),
        }
    }

    /// Walks forward while the next event's key is `<= k`. Returns `true`
    /// iff the cursor position changed.
    pub fn advance_to(&mut self, k: f64) -> bool {
        let mut moved = false;
        loop {
            let next_index = match self.position {
                Position::BeforeStart => 0,
                Position::At(i) => i + 1,
            };
            match self.events.get(next_index) {
                Some(event) if (self.key_of)(event) <= k => {
                    self.position = Position::At(next_index);
                    moved = true;
                }
                _ => break,
            }
        }
        moved
    }

    /// Advances by at most one event. Returns `Some(event)` if it advanced,
    /// `None` (cursor unchanged) otherwise.
    pub fn advance_one_if_ready(&mut self, k: f64) -> Option<&'a T> {
        let next_index = match self.position {
            Position::BeforeStart => 0,
            Position::At(i) => i + 1,
        };
        match self.events.get(next_index) {
            Some(event) if (self.key_of)(event) <= k => {
                self.position = Position::At(next_index);
                Some(event)
            }
            _ => None,
        }
    }

    /// Resets the cursor to before the first event.
    pub fn reset_to_start(&mut self) {
        self.position = Position::BeforeStart;
    }

    /// Lower-bound reset: positions the cursor so `current()` is the last
    /// event whose key is `<= k`, or before-start if none qualify.
    pub fn reset_to(&mut self, k: f64) {
        // Binary search would require T: the events slice is usually small
        // per instrument difficulty, so a linear scan keeps this simple and
        // matches the straightforward reference behavior.
        let mut last_ok = None;
        for (i, event) in self.events.iter().enumerate() {
            if (self.key_of)(event) <= k {
                last_ok = Some(i);
            } else {
                break;
            }
        }
        self.position = match last_ok {
            Some(i) => Position::At(i),
            None => Position::BeforeStart,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(events: &[f64]) -> EventCursor<'_, f64> {
        EventCursor::new(events, |e| *e)
    }

    #[test]
    fn advance_to_walks_forward_and_reports_movement() {
        let events = [1.0, 2.0, 3.0, 4.0];
        let mut c = cursor(&events);
        assert!(c.advance_to(2.5));
        assert_eq!(c.current(), Some(&2.0));
        assert!(!c.advance_to(2.5));
        assert!(c.advance_to(10.0));
        assert_eq!(c.current(), Some(&4.0));
    }

    #[test]
    fn advance_one_if_ready_moves_at_most_one_step() {
        let events = [1.0, 2.0, 3.0];
        let mut c = cursor(&events);
        assert_eq!(c.advance_one_if_ready(5.0), Some(&1.0));
        assert_eq!(c.advance_one_if_ready(0.0), None);
        assert_eq!(c.current(), Some(&1.0));
    }

    #[test]
    fn reset_to_then_advance_matches_reset_to_alone() {
        let events = [1.0, 2.0, 3.0, 4.0, 5.0];

        let mut direct = cursor(&events);
        direct.reset_to(3.5);

        let mut stepped = cursor(&events);
        stepped.advance_to(1.0);
        stepped.advance_to(2.0);
        stepped.advance_to(3.5);

        assert_eq!(direct.current_index(), stepped.current_index());
    }

    #[test]
    fn reset_to_before_all_events_is_before_start() {
        let events = [5.0, 6.0];
        let mut c = cursor(&events);
        c.reset_to(1.0);
        assert_eq!(c.current(), None);
    }
}
