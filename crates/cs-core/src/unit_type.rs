use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Motion, Side};
use crate::error::{CoreError, CoreResult};
use crate::geometry::Vec2;

/// Static properties shared by all units of one type.
///
/// Distances are in arena units, durations in frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    /// Type name, e.g. `"marine"`.
    pub name: String,
    /// Collision radius.
    pub radius: f64,
    /// Distance covered per frame.
    pub max_speed: f64,
    /// Sight distance to a target's edge.
    pub vision_range: f64,
    /// Attack distance to a target's edge.
    pub attack_range: f64,
    /// Health at spawn.
    pub max_health: i32,
    /// Damage per attack.
    pub attack: i32,
    /// Frames between attacks.
    pub cooldown: i32,
    /// Whether attacking halts movement.
    #[serde(default = "default_true")]
    pub only_attack_when_stopped: bool,
}

fn default_true() -> bool {
    true
}

impl UnitType {
    /// Light infantry.
    pub fn marine() -> Self {
        Self {
            name: "marine".into(),
            radius: 9.0,
            max_speed: 4.0,
            vision_range: 7.0 * 32.0,
            attack_range: 4.0 * 32.0,
            max_health: 40,
            attack: 6,
            cooldown: 15,
            only_attack_when_stopped: true,
        }
    }

    /// Slow-firing heavy unit.
    pub fn tank() -> Self {
        Self {
            name: "tank".into(),
            radius: 16.0,
            max_speed: 4.0,
            vision_range: 10.0 * 32.0,
            attack_range: 7.0 * 32.0,
            max_health: 150,
            attack: 30,
            cooldown: 37,
            only_attack_when_stopped: true,
        }
    }

    /// Check that the numbers describe a unit that can exist in an arena.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidUnitType {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(invalid("radius must be finite and non-negative"));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(invalid("max_speed must be finite and non-negative"));
        }
        if self.vision_range < 0.0 || self.attack_range < 0.0 {
            return Err(invalid("ranges must be non-negative"));
        }
        if self.max_health <= 0 {
            return Err(invalid("max_health must be positive"));
        }
        if self.cooldown < 0 {
            return Err(invalid("cooldown must be non-negative"));
        }
        Ok(())
    }

    /// Create a fresh, stationary, fully healed unit of this type.
    pub fn spawn(&self, id: EntityId, side: Side, pos: Vec2) -> Entity {
        Entity {
            id,
            side,
            kind: self.name.clone(),
            pos,
            radius: self.radius,
            max_speed: self.max_speed,
            vision_range: self.vision_range,
            attack_range: self.attack_range,
            max_health: self.max_health,
            attack: self.attack,
            cooldown: self.cooldown,
            only_attack_when_stopped: self.only_attack_when_stopped,
            health: self.max_health,
            cooldown_count: 0,
            motion: Motion::default(),
        }
    }
}

/// Named unit types available to scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCatalog {
    types: BTreeMap<String, UnitType>,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitCatalog {
    /// The built-in marine and tank table.
    pub fn standard() -> Self {
        Self::from_types([UnitType::marine(), UnitType::tank()])
    }

    /// Build a catalog from a list of types, keyed by name. Later duplicates win.
    pub fn from_types(types: impl IntoIterator<Item = UnitType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    /// Parse a JSON array of unit types and validate each entry.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let types: Vec<UnitType> = serde_json::from_str(json)?;
        for t in &types {
            t.validate()?;
        }
        Ok(Self::from_types(types))
    }

    /// Look up a unit type by name.
    pub fn get(&self, name: &str) -> CoreResult<&UnitType> {
        self.types
            .get(name)
            .ok_or_else(|| CoreError::UnknownUnitType(name.to_string()))
    }

    /// All unit types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitType> {
        self.types.values()
    }

    /// Number of unit types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the catalog has no unit types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
