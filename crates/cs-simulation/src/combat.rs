//! Attack resolution for one frame.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use cs_core::{Action, EntityId, Registry, Side};
use rand::Rng;
use tracing::{debug, trace};

use crate::context::SimContext;
use crate::event::{RejectReason, SimEventKind};
use crate::view::AgentView;
use crate::visibility::{can_attack, is_visible_to};

/// Check an attack order from `side` against the live registry.
///
/// `observers` are the side's unit snapshots from the start of the frame;
/// they only matter under fog of war. Returns the attacker's damage.
pub fn check_attack(
    registry: &Registry,
    side: Side,
    attacker: EntityId,
    target: EntityId,
    fog_of_war: bool,
    observers: &AgentView,
) -> Result<i32, RejectReason> {
    let a = registry.get(attacker).ok_or(RejectReason::UnknownAttacker)?;
    if a.side != side {
        return Err(RejectReason::NotOwner);
    }
    if !a.is_ready() {
        return Err(RejectReason::CoolingDown);
    }
    let t = registry.get(target).ok_or(RejectReason::UnknownTarget)?;
    if t.side == side {
        return Err(RejectReason::SameSide);
    }
    if !can_attack(a, t) {
        return Err(RejectReason::OutOfRange);
    }
    // Without fog every enemy is visible to the whole side.
    if fog_of_war && !is_visible_to(observers.units(), t) {
        return Err(RejectReason::NotVisible);
    }
    Ok(a.attack)
}

/// Apply every side's attack orders, then remove the units that died.
///
/// Red's orders run before Blue's, each in ascending attacker id. Damage is
/// applied immediately, so a unit killed earlier in the pass can still be
/// hit or fire back; deaths are only processed once all orders are in.
pub fn resolve_attacks(
    ctx: &mut SimContext<'_>,
    views: &[AgentView; 2],
    fog_of_war: bool,
    jitter: &RangeInclusive<i32>,
) {
    let mut killed = BTreeSet::new();

    for side in Side::ALL {
        let view = &views[side.index()];
        for (&attacker, action) in view.actions() {
            let Action::Attack { target } = *action else {
                continue;
            };

            let checked = check_attack(ctx.registry, side, attacker, target, fog_of_war, view);
            let damage = match checked {
                Ok(damage) => damage,
                Err(reason) => {
                    debug!(frame = ctx.frame, %attacker, %target, %reason, "attack rejected");
                    ctx.emit(
                        SimEventKind::AttackRejected {
                            attacker,
                            target,
                            reason,
                        },
                        format!("{attacker} -> {target} rejected: {reason}"),
                    );
                    continue;
                }
            };

            let offset = ctx.rng.random_range(jitter.clone());
            if let Some(t) = ctx.registry.get_mut(target)
                && t.take_damage(damage)
            {
                killed.insert(target);
            }
            if let Some(a) = ctx.registry.get_mut(attacker) {
                a.start_cooldown(offset);
                if a.only_attack_when_stopped {
                    a.stop();
                }
            }

            if let (Some(a), Some(t)) = (ctx.registry.get(attacker), ctx.registry.get(target)) {
                trace!(frame = ctx.frame, %attacker, %target, damage, health = t.health, "attack");
                ctx.listener.attack_occurred(a, t);
                let description = format!("{a} hits {} {} for {damage}", t.side, t.id);
                ctx.emit(
                    SimEventKind::Attack {
                        attacker,
                        target,
                        damage,
                    },
                    description,
                );
            }
        }
    }

    for id in killed {
        if let Some(unit) = ctx.registry.get(id) {
            ctx.listener.entity_killed(unit);
            let (side, description) = (unit.side, format!("{unit} killed"));
            debug!(frame = ctx.frame, %id, %side, "unit killed");
            ctx.emit(SimEventKind::Killed { entity: id, side }, description);
        }
        if let Err(e) = ctx.registry.remove(id) {
            debug!(%e, "dead unit already removed");
        }
    }

    ctx.listener.attacks_resolved();
}
