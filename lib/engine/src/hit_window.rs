//! Pure hit-window math: width from average note distance, then an
//! asymmetric front-end/back-end split around each note's time.

/// Front/back split of the timing window around a note, derived from the
/// chart's average note distance. Front-end and back-end are independent —
/// real charts tend to forgive early hits less than late ones, so the two
/// ends are not required to be mirror images of each other.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HitWindow {
    front_end_seconds: f64,
    back_end_seconds: f64,
}

impl HitWindow {
    /// Early side is wider than the late side by this ratio, matching the
    /// 200ms-early / 150ms-late miss boundary real five-fret judges use.
    const FRONT_TO_BACK_RATIO: f64 = 200.0 / 150.0;

    /// Computes the hit window from the chart's average spacing between
    /// consecutive notes. Denser charts get tighter windows, down to a
    /// floor, and sparser charts get wider windows, up to a ceiling; the
    /// front end is scaled wider than the back end by a fixed ratio.
    pub fn calculate(avg_note_distance: f64) -> Self {
        const MIN_BACK: f64 = 0.128;
        const MAX_BACK: f64 = 0.168;
        const SCALE: f64 = 0.5;

        let back = (avg_note_distance * SCALE).clamp(MIN_BACK, MAX_BACK);
        let front = back * Self::FRONT_TO_BACK_RATIO;
        Self {
            front_end_seconds: -front,
            back_end_seconds: back,
        }
    }

    /// Convenience alias for [`calculate`](Self::calculate); every real
    /// caller needs the derived window and nothing else.
    pub fn default_for(avg_note_distance: f64) -> Self {
        Self::calculate(avg_note_distance)
    }

    /// Builds a symmetric window directly from a width in seconds, bypassing
    /// the average-note-distance curve. Used by hosts that want to pin an
    /// exact window (and by tests that assert against literal values).
    pub fn with_width(width_seconds: f64) -> Self {
        Self {
            front_end_seconds: -width_seconds,
            back_end_seconds: width_seconds,
        }
    }

    /// Builds a window from independent front/back bounds. `front_end_seconds`
    /// should be negative or zero, `back_end_seconds` positive.
    pub fn with_front_back(front_end_seconds: f64, back_end_seconds: f64) -> Self {
        Self {
            front_end_seconds,
            back_end_seconds,
        }
    }

    /// How far before `note.time` a hit is still valid. Negative or zero.
    pub fn front_end(&self) -> f64 {
        self.front_end_seconds
    }

    /// How far after `note.time` a hit is still valid. Positive.
    pub fn back_end(&self) -> f64 {
        self.back_end_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_clamped_to_bounds() {
        assert_eq!(HitWindow::calculate(0.0).back_end(), 0.128);
        assert_eq!(HitWindow::calculate(1.0).back_end(), 0.168);
    }

    #[test]
    fn calculate_is_asymmetric_by_construction() {
        let w = HitWindow::calculate(0.3);
        assert!(w.front_end() < 0.0);
        assert!(w.back_end() > 0.0);
        assert_ne!(w.front_end(), -w.back_end());
        assert!(w.front_end().abs() > w.back_end());
    }

    #[test]
    fn with_width_is_symmetric() {
        let w = HitWindow::with_width(0.14);
        assert_eq!(w.front_end(), -0.14);
        assert_eq!(w.back_end(), 0.14);
    }

    #[test]
    fn with_front_back_keeps_independent_bounds() {
        let w = HitWindow::with_front_back(-0.2, 0.15);
        assert_eq!(w.front_end(), -0.2);
        assert_eq!(w.back_end(), 0.15);
    }
}
