//! Movement orders and per-frame motion.

use cs_core::{Action, Arena, Entity, Side, Vec2};
use tracing::{debug, trace, warn};

use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::view::AgentView;

/// Result of moving a circle one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Final center position.
    pub position: Vec2,
    /// Whether the step was cut short by an arena wall.
    pub collided: bool,
}

/// Move a circle of `radius` at `pos` by `delta`, stopping at the first wall.
///
/// The step is scaled by the earliest time of impact `t` in `[0, 1]`, then
/// clamped into the arena.
pub fn advance_circle(pos: Vec2, delta: Vec2, radius: f64, arena: Arena) -> Advance {
    let target = pos + delta;
    let mut t: f64 = 1.0;

    if delta.x < 0.0 && target.x - radius < 0.0 {
        t = t.min(1.0 - (target.x - radius) / delta.x);
    }
    if delta.x > 0.0 && target.x + radius > arena.width {
        t = t.min(1.0 - (target.x + radius - arena.width) / delta.x);
    }
    if delta.y < 0.0 && target.y - radius < 0.0 {
        t = t.min(1.0 - (target.y - radius) / delta.y);
    }
    if delta.y > 0.0 && target.y + radius > arena.height {
        t = t.min(1.0 - (target.y + radius - arena.height) / delta.y);
    }
    let t = t.max(0.0);

    let mut position = pos + delta.scale(t);
    if position.x - radius < 0.0 {
        position.x = radius;
    }
    if position.x + radius > arena.width {
        position.x = arena.width - radius;
    }
    if position.y - radius < 0.0 {
        position.y = radius;
    }
    if position.y + radius > arena.height {
        position.y = arena.height - radius;
    }

    Advance {
        position,
        collided: t < 1.0,
    }
}

/// Advance one unit by a frame of its motion. Returns `true` on a wall hit.
///
/// The last step of a trip snaps to the remaining distance so units end
/// exactly on their destination.
pub fn step_unit(unit: &mut Entity, arena: Arena) -> bool {
    if !unit.is_moving() {
        return false;
    }
    let delta = if unit.motion.steps_left == 1 {
        unit.motion.target - unit.pos
    } else {
        unit.motion.delta
    };
    let advance = advance_circle(unit.pos, delta, unit.radius, arena);
    unit.pos = advance.position;
    if advance.collided {
        unit.stop();
    }
    advance.collided
}

/// Apply every side's move and stop orders, move all units, then tick all
/// unit counters.
pub fn resolve_motion(ctx: &mut SimContext<'_>, views: &[AgentView; 2]) {
    for side in Side::ALL {
        for (&id, action) in views[side.index()].actions() {
            let Some(unit) = ctx.registry.get_mut(id) else {
                continue;
            };
            if unit.side != side {
                warn!(frame = ctx.frame, %id, %side, "order for foreign unit ignored");
                continue;
            }
            match *action {
                Action::Move { destination } => {
                    if let Err(e) = unit.start_motion(destination) {
                        debug!(frame = ctx.frame, %e, "move rejected");
                        let description = e.to_string();
                        ctx.emit(SimEventKind::MoveRejected { entity: id }, description);
                    }
                }
                Action::Stop => unit.stop(),
                Action::Attack { .. } | Action::NoOp => {}
            }
        }
    }

    let arena = ctx.arena;
    let mut collided = Vec::new();
    for unit in ctx.registry.iter_mut() {
        if step_unit(unit, arena) {
            trace!(frame = ctx.frame, id = %unit.id, pos = %unit.pos, "border collision");
            collided.push(unit.id);
        }
    }
    for id in collided {
        ctx.emit(
            SimEventKind::BorderCollision { entity: id },
            format!("{id} stopped at the arena border"),
        );
    }

    for unit in ctx.registry.iter_mut() {
        unit.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{EntityId, UnitType};

    const ARENA: Arena = Arena::new(100.0, 100.0);

    #[test]
    fn free_step_moves_full_delta() {
        let a = advance_circle(Vec2::new(50.0, 50.0), Vec2::new(3.0, -4.0), 5.0, ARENA);
        assert_eq!(a.position, Vec2::new(53.0, 46.0));
        assert!(!a.collided);
    }

    #[test]
    fn wall_hit_stops_at_time_of_impact() {
        let a = advance_circle(Vec2::new(90.0, 50.0), Vec2::new(10.0, 0.0), 5.0, ARENA);
        assert_eq!(a.position, Vec2::new(95.0, 50.0));
        assert!(a.collided);

        // diagonal: x wall reached at t = 0.5, y moves half way too
        let a = advance_circle(Vec2::new(10.0, 50.0), Vec2::new(-10.0, 4.0), 5.0, ARENA);
        assert_eq!(a.position, Vec2::new(5.0, 52.0));
        assert!(a.collided);
    }

    #[test]
    fn touching_wall_moving_outward_stays_put() {
        let a = advance_circle(Vec2::new(5.0, 50.0), Vec2::new(-2.0, 0.0), 5.0, ARENA);
        assert_eq!(a.position, Vec2::new(5.0, 50.0));
        assert!(a.collided);
    }

    #[test]
    fn last_step_snaps_to_destination() {
        let mut unit = UnitType::marine().spawn(EntityId(1), Side::Red, Vec2::new(50.0, 50.0));
        let dest = Vec2::new(57.0, 50.0);
        assert_eq!(unit.start_motion(dest).unwrap(), 2);
        assert!(!step_unit(&mut unit, ARENA));
        unit.tick();
        assert!(!step_unit(&mut unit, ARENA));
        unit.tick();
        assert!(unit.pos.dist(dest) < 1e-9);
        assert!(!unit.is_moving());
    }

    #[test]
    fn stationary_units_do_not_move() {
        let mut unit = UnitType::marine().spawn(EntityId(1), Side::Red, Vec2::new(50.0, 50.0));
        assert!(!step_unit(&mut unit, ARENA));
        assert_eq!(unit.pos, Vec2::new(50.0, 50.0));
    }
}
