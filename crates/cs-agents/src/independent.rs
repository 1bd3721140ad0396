use std::any::Any;

use cs_core::{Action, EntityId};
use cs_simulation::{Agent, AgentView};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::trace;

use crate::policy::{TargetPolicy, TargetSelector};

/// Agent that lets every unit act on its own.
///
/// A ready unit with an enemy in range attacks the first target its policy
/// selects. Any other unit that has come to a halt heads for a random point
/// on an arena edge, so the armies keep sweeping the field until they meet.
#[derive(Debug)]
pub struct IndependentAgent {
    name: String,
    selector: Box<dyn TargetSelector>,
    split_threshold: f64,
    rng: StdRng,
}

impl IndependentAgent {
    /// Create an agent for `policy` with its own random stream.
    pub fn new(policy: TargetPolicy, seed: u64) -> Self {
        Self {
            name: format!("independent/{policy}"),
            selector: policy.selector(),
            split_threshold: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Index the opponent's units with this split threshold when searching
    /// for targets (`<= 0` scans linearly).
    pub fn with_split_threshold(mut self, eps: f64) -> Self {
        self.split_threshold = eps;
        self
    }

    /// The targeting policy in use.
    pub fn policy(&self) -> TargetPolicy {
        self.selector.policy()
    }
}

impl Agent for IndependentAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_frame(&mut self, frame: u64, own: &mut AgentView, opponent: &AgentView) {
        let index = opponent.build_index(self.split_threshold);
        let arena = own.arena();
        let mut orders: Vec<(EntityId, Action)> = Vec::with_capacity(own.len());

        for unit in own.units() {
            if unit.is_ready() {
                let candidates = opponent.attackable_by(unit, index.as_ref());
                if let Some(&target) = self.selector.select(unit, &candidates).first() {
                    trace!(frame, unit = %unit.id, %target, "attack");
                    orders.push((unit.id, Action::Attack { target }));
                    continue;
                }
            }
            if !unit.is_moving() {
                let destination = arena.random_edge_position(unit.radius, unit.pos, &mut self.rng);
                orders.push((unit.id, Action::Move { destination }));
            }
        }

        for (id, action) in orders {
            own.add_action(id, action);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{Arena, Side, UnitType, Vec2};

    fn views() -> (AgentView, AgentView) {
        let arena = Arena::new(800.0, 800.0);
        let own = AgentView::with_units(
            Side::Red,
            arena,
            vec![
                UnitType::marine().spawn(EntityId(1), Side::Red, Vec2::new(100.0, 100.0)),
                UnitType::marine().spawn(EntityId(3), Side::Red, Vec2::new(600.0, 600.0)),
            ],
        );
        let opponent = AgentView::with_units(
            Side::Blue,
            arena,
            vec![
                UnitType::marine().spawn(EntityId(2), Side::Blue, Vec2::new(150.0, 100.0)),
                UnitType::marine().spawn(EntityId(4), Side::Blue, Vec2::new(120.0, 100.0)),
            ],
        );
        (own, opponent)
    }

    #[test]
    fn ready_units_attack_and_idle_units_wander() {
        let (mut own, opponent) = views();
        let mut agent = IndependentAgent::new(TargetPolicy::Closest, 1).with_split_threshold(40.0);
        agent.on_frame(0, &mut own, &opponent);

        assert_eq!(
            own.action_for(EntityId(1)),
            Some(&Action::Attack {
                target: EntityId(4)
            })
        );
        match own.action_for(EntityId(3)) {
            Some(Action::Move { destination }) => {
                assert!(own.arena().contains_circle(*destination, 9.0));
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn passive_policy_never_attacks() {
        let (mut own, opponent) = views();
        let mut agent = IndependentAgent::new(TargetPolicy::None, 1);
        agent.on_frame(0, &mut own, &opponent);
        assert!(
            own.actions()
                .values()
                .all(|a| matches!(a, Action::Move { .. }))
        );
        assert_eq!(agent.name(), "independent/none");
    }

    #[test]
    fn same_seed_same_orders() {
        let (mut a, opponent) = views();
        let (mut b, _) = views();
        IndependentAgent::new(TargetPolicy::Weakest, 9).on_frame(0, &mut a, &opponent);
        IndependentAgent::new(TargetPolicy::Weakest, 9).on_frame(0, &mut b, &opponent);
        assert_eq!(a.actions(), b.actions());
    }
}
