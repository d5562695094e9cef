//! OverrideGates and the `FlagOracle` capability.

use uuid::Uuid;

/// Profile-scoped boolean flags the engine gates behavior on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProfileFlag {
    AutoStrum,
    AutoPlay,
}

impl ProfileFlag {
    pub const ALL: [ProfileFlag; 2] = [ProfileFlag::AutoStrum, ProfileFlag::AutoPlay];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileFlag::AutoStrum => "AutoStrum",
            ProfileFlag::AutoPlay => "AutoPlay",
        }
    }
}

/// Read-only capability the engine consults for profile overrides. Queried
/// at least once per tick; implementations may change the observed value
/// between ticks (e.g. an HTTP-backed store), and the engine is required to
/// observe the transition on the very next tick with no residual state.
pub trait FlagOracle {
    /// Default when a profile is not configured: `false`.
    fn is_flag_set(&self, profile_id: Uuid, flag: ProfileFlag) -> bool;
}

/// An oracle that never reports any flag set — the default for engine
/// construction when no profile overrides are wired up.
pub struct NoOverridesOracle;

impl FlagOracle for NoOverridesOracle {
    fn is_flag_set(&self, _profile_id: Uuid, _flag: ProfileFlag) -> bool {
        false
    }
}

/// A simple in-memory oracle for construction and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlagOracle {
    flags: std::collections::HashMap<(Uuid, ProfileFlag), bool>,
}

impl InMemoryFlagOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, profile_id: Uuid, flag: ProfileFlag, enabled: bool) {
        self.flags.insert((profile_id, flag), enabled);
    }
}

impl FlagOracle for InMemoryFlagOracle {
    fn is_flag_set(&self, profile_id: Uuid, flag: ProfileFlag) -> bool {
        self.flags.get(&(profile_id, flag)).copied().unwrap_or(false)
    }
}

/// Queries the two override flags for a profile established at engine
/// construction time.
pub struct OverrideGates {
    profile_id: Uuid,
}

impl OverrideGates {
    pub fn new(profile_id: Uuid) -> Self {
        Self { profile_id }
    }

    pub fn is_auto_play_active(&self, oracle: &dyn FlagOracle) -> bool {
        oracle.is_flag_set(self.profile_id, ProfileFlag::AutoPlay)
    }

    pub fn is_auto_strum_active(&self, oracle: &dyn FlagOracle) -> bool {
        oracle.is_flag_set(self.profile_id, ProfileFlag::AutoStrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_profile_defaults_to_false() {
        let oracle = InMemoryFlagOracle::new();
        let gates = OverrideGates::new(Uuid::nil());
        assert!(!gates.is_auto_play_active(&oracle));
        assert!(!gates.is_auto_strum_active(&oracle));
    }

    #[test]
    fn explicit_flag_overrides_default() {
        let mut oracle = InMemoryFlagOracle::new();
        let id = Uuid::nil();
        oracle.set(id, ProfileFlag::AutoPlay, true);
        let gates = OverrideGates::new(id);
        assert!(gates.is_auto_play_active(&oracle));
        assert!(!gates.is_auto_strum_active(&oracle));
    }
}
