//! Thread-safe profile-flag store backing the HTTP control plane. Reads
//! from the engine side must be atomically observable single lookups; a
//! `RwLock<HashMap>` satisfies that without the engine ever touching the
//! lock directly — it only sees `&dyn FlagOracle`.

use std::collections::HashMap;
use std::sync::RwLock;

use engine::{FlagOracle, ProfileFlag};
use uuid::Uuid;

use crate::error::FlagParseError;

/// Case-insensitive flag-name parsing, rejecting the synthetic `None` value.
pub fn parse_flag_name(raw: &str) -> Result<ProfileFlag, FlagParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "autostrum" => Ok(ProfileFlag::AutoStrum),
        "autoplay" => Ok(ProfileFlag::AutoPlay),
        "none" => Err(FlagParseError::NoneFlagRejected),
        _ => Err(FlagParseError::UnknownFlag(raw.to_string())),
    }
}

pub fn parse_profile_id(raw: &str) -> Result<Uuid, FlagParseError> {
    Uuid::parse_str(raw).map_err(|_| FlagParseError::InvalidProfileId(raw.to_string()))
}

pub fn parse_enabled(raw: &str) -> Result<bool, FlagParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(FlagParseError::InvalidEnabled(other.to_string())),
    }
}

/// The profile-flag store. Cheap to clone (an `Arc` would be the usual
/// wrapper at the call site); the lock is internal so every method is a
/// single atomic read or write.
#[derive(Debug, Default)]
pub struct FlagStore {
    flags: RwLock<HashMap<(Uuid, ProfileFlag), bool>>,
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, profile_id: Uuid, flag: ProfileFlag, enabled: bool) {
        let mut guard = self.flags.write().expect("flag store lock poisoned");
        guard.insert((profile_id, flag), enabled);
    }

    /// Snapshot of every registered profile's flags, for `GET /flags/status`.
    pub fn status(&self) -> HashMap<Uuid, HashMap<&'static str, bool>> {
        let guard = self.flags.read().expect("flag store lock poisoned");
        let mut by_profile: HashMap<Uuid, HashMap<&'static str, bool>> = HashMap::new();
        for (&(profile_id, flag), &enabled) in guard.iter() {
            by_profile
                .entry(profile_id)
                .or_default()
                .insert(flag.as_str(), enabled);
        }
        by_profile
    }
}

impl FlagOracle for FlagStore {
    fn is_flag_set(&self, profile_id: Uuid, flag: ProfileFlag) -> bool {
        let guard = self.flags.read().expect("flag store lock poisoned");
        guard.get(&(profile_id, flag)).copied().unwrap_or(false)
    }
}
