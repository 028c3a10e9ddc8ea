//! Driver behavioral profiles.

use mt_core::ProfileId;

/// Behavioral parameters of one driver class.
///
/// `speed_factor` scales every street's limit for this driver;
/// `reaction_time_s` sets the headway window of the car-following rule.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverProfile {
    pub speed_factor: f64,
    pub reaction_time_s: f64,
}

/// An ordered, immutable set of named profiles.
///
/// Order matters: the spawner draws profiles uniformly by index, so the
/// entry order is part of a run's deterministic input.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileSet {
    entries: Vec<(String, DriverProfile)>,
}

impl ProfileSet {
    /// The standard three-driver mix.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                ("raser".into(), DriverProfile { speed_factor: 1.50, reaction_time_s: 0.8 }),
                ("normal".into(), DriverProfile { speed_factor: 1.00, reaction_time_s: 1.0 }),
                ("slow_driver".into(), DriverProfile { speed_factor: 0.75, reaction_time_s: 1.5 }),
            ],
        }
    }

    /// A caller-defined profile mix.  Must be non-empty.
    pub fn custom(entries: Vec<(String, DriverProfile)>) -> Self {
        assert!(!entries.is_empty(), "profile set must not be empty");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn profile(&self, id: ProfileId) -> &DriverProfile {
        &self.entries[id.index()].1
    }

    #[inline]
    pub fn name(&self, id: ProfileId) -> &str {
        &self.entries[id.index()].0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileId, &str, &DriverProfile)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (name, p))| (ProfileId(i as u16), name.as_str(), p))
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::standard()
    }
}
