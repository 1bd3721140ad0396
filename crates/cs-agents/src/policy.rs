use std::fmt;
use std::str::FromStr;

use cs_core::{Entity, EntityId};
use cs_simulation::view::{closest_targets, most_dangerous_targets, weakest_targets};

use crate::error::AgentError;

/// Which enemy a unit prefers among those in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPolicy {
    /// Never attack.
    None,
    /// Nearest enemy.
    Closest,
    /// Enemy with the least health.
    Weakest,
    /// Enemy dealing the most damage per frame relative to its health.
    MostDangerous,
}

impl TargetPolicy {
    /// All policies in display order.
    pub const ALL: [TargetPolicy; 4] = [
        TargetPolicy::None,
        TargetPolicy::Closest,
        TargetPolicy::Weakest,
        TargetPolicy::MostDangerous,
    ];

    /// The strategy implementing this policy.
    pub fn selector(self) -> Box<dyn TargetSelector> {
        match self {
            Self::None => Box::new(NoTargets),
            Self::Closest => Box::new(Closest),
            Self::Weakest => Box::new(Weakest),
            Self::MostDangerous => Box::new(MostDangerous),
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Closest => "closest",
            Self::Weakest => "weakest",
            Self::MostDangerous => "most_dangerous",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetPolicy {
    type Err = AgentError;

    /// Accepts the display names, with or without an `attack_` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        let name = lower.strip_prefix("attack_").unwrap_or(&lower);
        match name {
            "none" => Ok(Self::None),
            "closest" => Ok(Self::Closest),
            "weakest" => Ok(Self::Weakest),
            "most_dangerous" => Ok(Self::MostDangerous),
            _ => Err(AgentError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Chooses targets from the enemies already known to be in range.
pub trait TargetSelector: fmt::Debug {
    /// The policy this selector implements.
    fn policy(&self) -> TargetPolicy;

    /// The preferred targets, every tie included, in candidate order.
    fn select(&self, unit: &Entity, candidates: &[&Entity]) -> Vec<EntityId>;
}

/// Selector for [`TargetPolicy::None`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTargets;

impl TargetSelector for NoTargets {
    fn policy(&self) -> TargetPolicy {
        TargetPolicy::None
    }

    fn select(&self, _unit: &Entity, _candidates: &[&Entity]) -> Vec<EntityId> {
        Vec::new()
    }
}

/// Selector for [`TargetPolicy::Closest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Closest;

impl TargetSelector for Closest {
    fn policy(&self) -> TargetPolicy {
        TargetPolicy::Closest
    }

    fn select(&self, unit: &Entity, candidates: &[&Entity]) -> Vec<EntityId> {
        closest_targets(unit, candidates)
    }
}

/// Selector for [`TargetPolicy::Weakest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Weakest;

impl TargetSelector for Weakest {
    fn policy(&self) -> TargetPolicy {
        TargetPolicy::Weakest
    }

    fn select(&self, _unit: &Entity, candidates: &[&Entity]) -> Vec<EntityId> {
        weakest_targets(candidates)
    }
}

/// Selector for [`TargetPolicy::MostDangerous`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MostDangerous;

impl TargetSelector for MostDangerous {
    fn policy(&self) -> TargetPolicy {
        TargetPolicy::MostDangerous
    }

    fn select(&self, _unit: &Entity, candidates: &[&Entity]) -> Vec<EntityId> {
        most_dangerous_targets(candidates)
    }
}
