//! Per-side snapshots of the world and the helper queries agents use on them.

use std::collections::BTreeMap;

use cs_core::{Action, Arena, Entity, EntityId, Rect, Side};

use crate::quadtree::SpatialIndex;
use crate::visibility::can_attack;

/// A snapshot of one side's units, taken at the start of a frame.
///
/// The view handed to an agent for its own side also collects the actions
/// the agent wants its units to take. Views for the opponent only carry
/// units; their action map stays empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    side: Side,
    arena: Arena,
    units: Vec<Entity>,
    max_radius: f64,
    actions: BTreeMap<EntityId, Action>,
}

impl AgentView {
    /// An empty view of `side`'s units.
    pub fn new(side: Side, arena: Arena) -> Self {
        Self {
            side,
            arena,
            units: Vec::new(),
            max_radius: 0.0,
            actions: BTreeMap::new(),
        }
    }

    /// A view holding copies of `units`, ordered by id.
    pub fn with_units(side: Side, arena: Arena, units: impl IntoIterator<Item = Entity>) -> Self {
        let mut view = Self::new(side, arena);
        for unit in units {
            view.push_unit(unit);
        }
        view.units.sort_by_key(|u| u.id);
        view
    }

    pub(crate) fn push_unit(&mut self, unit: Entity) {
        self.max_radius = self.max_radius.max(unit.radius);
        self.units.push(unit);
    }

    /// The side whose units this view shows.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The arena the units live in.
    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Unit snapshots in ascending id order.
    pub fn units(&self) -> &[Entity] {
        &self.units
    }

    /// Look up a unit snapshot by id.
    pub fn unit(&self, id: EntityId) -> Option<&Entity> {
        self.units
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.units[i])
    }

    /// Largest radius among the units, 0 for an empty view.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Number of units in the view.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the view shows no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Record an order for `actor`. A later order for the same actor
    /// replaces the earlier one.
    pub fn add_action(&mut self, actor: EntityId, action: Action) {
        self.actions.insert(actor, action);
    }

    /// All recorded orders in ascending actor id order.
    pub fn actions(&self) -> &BTreeMap<EntityId, Action> {
        &self.actions
    }

    /// The order recorded for `actor`, if any.
    pub fn action_for(&self, actor: EntityId) -> Option<&Action> {
        self.actions.get(&actor)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Quadtree over this view's units (payload: index into [`Self::units`]),
    /// or `None` when `eps` disables indexing.
    pub fn build_index(&self, eps: f64) -> Option<SpatialIndex<usize>> {
        let mut index = SpatialIndex::covering(self.arena, eps)?;
        for (i, u) in self.units.iter().enumerate() {
            index.insert(u.pos.x, u.pos.y, i);
        }
        Some(index)
    }

    /// Units of this view that `attacker` can reach, ordered by id.
    ///
    /// `index` must have been built by [`Self::build_index`] on this view.
    pub fn attackable_by(
        &self,
        attacker: &Entity,
        index: Option<&SpatialIndex<usize>>,
    ) -> Vec<&Entity> {
        match index {
            Some(index) => {
                enemies_within_attack_range_indexed(attacker, &self.units, index, self.max_radius)
            }
            None => enemies_within_attack_range(attacker, &self.units),
        }
    }
}

/// Enemies within `unit`'s attack range, by linear scan, in slice order.
pub fn enemies_within_attack_range<'a>(unit: &Entity, enemies: &'a [Entity]) -> Vec<&'a Entity> {
    enemies.iter().filter(|e| can_attack(unit, e)).collect()
}

/// Enemies within `unit`'s attack range, using a quadtree built over `enemies`.
///
/// Only the enemies inside a square of half-extent
/// `attack_range + 1.1 * max_radius` around the unit are tested. The result
/// is ordered by id and matches [`enemies_within_attack_range`] on id-sorted
/// input.
pub fn enemies_within_attack_range_indexed<'a>(
    unit: &Entity,
    enemies: &'a [Entity],
    index: &SpatialIndex<usize>,
    max_radius: f64,
) -> Vec<&'a Entity> {
    let reach = unit.attack_range + max_radius * 1.1;
    let mut hits: Vec<&Entity> = index
        .query(&Rect::around(unit.pos, reach))
        .into_iter()
        .filter_map(|&i| enemies.get(i))
        .filter(|e| can_attack(unit, e))
        .collect();
    hits.sort_by_key(|e| e.id);
    hits
}

fn tied_best(candidates: &[&Entity], key: impl Fn(&Entity) -> f64) -> Vec<EntityId> {
    let best = candidates.iter().map(|e| key(e)).fold(f64::INFINITY, f64::min);
    candidates
        .iter()
        .filter(|e| key(e) == best)
        .map(|e| e.id)
        .collect()
}

/// Candidates at minimal distance from `unit`, every tie included.
pub fn closest_targets(unit: &Entity, candidates: &[&Entity]) -> Vec<EntityId> {
    tied_best(candidates, |e| unit.pos.dist2(e.pos))
}

/// Candidates with minimal current health, every tie included.
pub fn weakest_targets(candidates: &[&Entity]) -> Vec<EntityId> {
    tied_best(candidates, |e| f64::from(e.health))
}

/// Candidates with maximal [`Entity::danger`], every tie included.
pub fn most_dangerous_targets(candidates: &[&Entity]) -> Vec<EntityId> {
    tied_best(candidates, |e| -e.danger())
}
