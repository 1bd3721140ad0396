//! Sight and reach tests between units.

use cs_core::geometry::square;
use cs_core::{Arena, Entity, Rect};

use crate::quadtree::SpatialIndex;

/// Whether `observer` sees any part of `target`'s body.
pub fn can_see(observer: &Entity, target: &Entity) -> bool {
    observer.pos.dist2(target.pos) < square(observer.vision_range + target.radius)
}

/// Whether `target`'s body is within `attacker`'s attack range.
pub fn can_attack(attacker: &Entity, target: &Entity) -> bool {
    attacker.pos.dist2(target.pos) < square(attacker.attack_range + target.radius)
}

/// Whether any of `observers` sees `target`.
pub fn is_visible_to(observers: &[Entity], target: &Entity) -> bool {
    observers.iter().any(|o| can_see(o, target))
}

/// Copies of the `enemies` seen by at least one of `observers`, in the
/// order they appear in `enemies`.
///
/// With a positive `eps` the enemies are indexed in a quadtree first and
/// each observer only tests the enemies near it. The result is identical
/// to the linear scan either way.
pub fn visible_enemies(
    observers: &[Entity],
    enemies: &[Entity],
    arena: Arena,
    eps: f64,
) -> Vec<Entity> {
    if observers.is_empty() || enemies.is_empty() {
        return Vec::new();
    }

    let mut seen = vec![false; enemies.len()];
    match SpatialIndex::covering(arena, eps) {
        Some(mut index) => {
            for (i, e) in enemies.iter().enumerate() {
                index.insert(e.pos.x, e.pos.y, i);
            }
            let max_radius = enemies.iter().map(|e| e.radius).fold(0.0, f64::max);
            for observer in observers {
                let reach = observer.vision_range + max_radius * 1.1;
                for &i in index.query(&Rect::around(observer.pos, reach)) {
                    if !seen[i] && can_see(observer, &enemies[i]) {
                        seen[i] = true;
                    }
                }
            }
        }
        None => {
            for (flag, enemy) in seen.iter_mut().zip(enemies) {
                *flag = is_visible_to(observers, enemy);
            }
        }
    }

    enemies
        .iter()
        .zip(seen)
        .filter(|(_, seen)| *seen)
        .map(|(e, _)| e.clone())
        .collect()
}
