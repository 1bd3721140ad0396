use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, Side};
use crate::error::{CoreError, CoreResult};
use crate::geometry::Vec2;
use crate::unit_type::UnitType;

/// All living units, keyed and iterated by ascending [`EntityId`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    units: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl Registry {
    /// Create an empty registry. The first spawned unit gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Spawn a unit of the given type and return its freshly allocated id.
    pub fn spawn(&mut self, unit_type: &UnitType, side: Side, pos: Vec2) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.units.insert(id, unit_type.spawn(id, side, pos));
        id
    }

    /// Get a unit by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.units.get(&id)
    }

    /// Get a mutable reference to a unit by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.units.get_mut(&id)
    }

    /// Whether a unit with this id is alive.
    pub fn contains(&self, id: EntityId) -> bool {
        self.units.contains_key(&id)
    }

    /// Remove a unit, returning it.
    pub fn remove(&mut self, id: EntityId) -> CoreResult<Entity> {
        self.units.remove(&id).ok_or(CoreError::EntityNotFound(id))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All units in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.units.values()
    }

    /// All units in ascending id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.units.values_mut()
    }

    /// Units owned by `side` in ascending id order.
    pub fn by_side(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.units.values().filter(move |u| u.side == side)
    }

    /// Number of living units per side, indexed by [`Side::index`].
    pub fn count_by_side(&self) -> [usize; 2] {
        let mut counts = [0, 0];
        for u in self.units.values() {
            counts[u.side.index()] += 1;
        }
        counts
    }

    /// Total number of living units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if no units are alive.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
