use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geometry::Vec2;

/// Trajectories needing this many frames or more are refused.
pub const MAX_MOTION_FRAMES: f64 = 100_000.0;

/// Stable identifier of a unit. Allocated in increasing order by the [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two opposing players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Player 0.
    Red,
    /// Player 1.
    Blue,
}

impl Side {
    /// Both sides in resolution order.
    pub const ALL: [Side; 2] = [Side::Red, Side::Blue];

    /// Index of this side (0 for red, 1 for blue).
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
        }
    }

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Blue => write!(f, "BLUE"),
        }
    }
}

/// Constant-velocity movement toward a target position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Where the unit ends up after the last step.
    pub target: Vec2,
    /// Displacement applied on every step but the last.
    pub delta: Vec2,
    /// Remaining steps; zero means stopped.
    pub steps_left: u32,
}

/// A combat unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Owning side.
    pub side: Side,
    /// Name of the unit type this entity was spawned from.
    pub kind: String,
    /// Center position.
    pub pos: Vec2,
    /// Collision radius.
    pub radius: f64,
    /// Distance covered per frame at full speed.
    pub max_speed: f64,
    /// How far this unit can see (center to target edge).
    pub vision_range: f64,
    /// How far this unit can attack (center to target edge).
    pub attack_range: f64,
    /// Health at spawn.
    pub max_health: i32,
    /// Damage dealt per attack.
    pub attack: i32,
    /// Frames to wait between attacks (0 = fire every frame).
    pub cooldown: i32,
    /// Attacking halts any ongoing movement.
    pub only_attack_when_stopped: bool,
    /// Current health; the unit is removed once this drops to 0 or below.
    pub health: i32,
    /// Frames until the next attack; `<= 0` means ready.
    pub cooldown_count: i32,
    /// Current movement.
    pub motion: Motion,
}

impl Entity {
    /// Whether the unit has movement steps left.
    pub fn is_moving(&self) -> bool {
        self.motion.steps_left > 0
    }

    /// Whether the unit may attack this frame.
    pub fn is_ready(&self) -> bool {
        self.cooldown_count <= 0
    }

    /// Cancel any ongoing movement.
    pub fn stop(&mut self) {
        self.motion.steps_left = 0;
    }

    /// Schedule a full-speed straight-line trip to `destination`.
    ///
    /// Returns the number of frames the trip takes. A destination at the
    /// current position leaves the unit stopped.
    pub fn start_motion(&mut self, destination: Vec2) -> CoreResult<u32> {
        let distance = self.pos.dist(destination);
        let time = distance / self.max_speed;
        if !time.is_finite() || time >= MAX_MOTION_FRAMES {
            return Err(CoreError::UnreachableDestination {
                id: self.id,
                distance,
                speed: self.max_speed,
            });
        }

        let steps = time.ceil() as u32;
        self.motion.steps_left = steps;
        if steps == 0 {
            return Ok(0);
        }
        self.motion.target = destination;
        self.motion.delta = (destination - self.pos).scale(1.0 / time);
        Ok(steps)
    }

    /// Subtract `amount` from health. Returns `true` if the unit is now dead.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health <= 0
    }

    /// Restart the attack cooldown after firing, offset by `jitter` frames.
    ///
    /// The extra frame accounts for the tick at the end of the current frame;
    /// the counter never drops below one.
    pub fn start_cooldown(&mut self, jitter: i32) {
        self.cooldown_count = (self.cooldown + 1 + jitter).max(1);
    }

    /// Advance movement and cooldown counters by one frame.
    pub fn tick(&mut self) {
        if self.is_moving() {
            self.motion.steps_left -= 1;
        }
        if !self.is_ready() {
            self.cooldown_count -= 1;
        }
    }

    /// Damage per frame relative to remaining health. Higher is more dangerous.
    pub fn danger(&self) -> f64 {
        f64::from(self.attack) / f64::from(self.cooldown + 1) / f64::from(self.health)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {} hp {}/{}",
            self.side, self.kind, self.id, self.pos, self.health, self.max_health
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_type::UnitType;

    fn marine_at(x: f64, y: f64) -> Entity {
        UnitType::marine().spawn(EntityId(1), Side::Red, Vec2::new(x, y))
    }

    #[test]
    fn side_index_and_opponent() {
        assert_eq!(Side::Red.index(), 0);
        assert_eq!(Side::Blue.index(), 1);
        assert_eq!(Side::Red.opponent(), Side::Blue);
        assert_eq!(Side::ALL, [Side::Red, Side::Blue]);
        assert_eq!(Side::Blue.to_string(), "BLUE");
    }

    #[test]
    fn start_motion_schedules_ceil_steps() {
        let mut u = marine_at(0.0, 0.0);
        // speed 4, distance 10 => 2.5 frames => 3 steps
        let steps = u.start_motion(Vec2::new(6.0, 8.0)).unwrap();
        assert_eq!(steps, 3);
        assert!(u.is_moving());
        assert_eq!(u.motion.target, Vec2::new(6.0, 8.0));
        // delta has length max_speed
        assert!((u.motion.delta.dist(Vec2::ZERO) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn start_motion_to_current_position_stops() {
        let mut u = marine_at(5.0, 5.0);
        u.start_motion(Vec2::new(50.0, 5.0)).unwrap();
        assert!(u.is_moving());
        assert_eq!(u.start_motion(Vec2::new(5.0, 5.0)).unwrap(), 0);
        assert!(!u.is_moving());
    }

    #[test]
    fn start_motion_rejects_immobile_units() {
        let mut u = marine_at(5.0, 5.0);
        u.max_speed = 0.0;
        assert!(u.start_motion(Vec2::new(6.0, 5.0)).is_err());
        assert!(!u.is_moving());
    }

    #[test]
    fn cooldown_is_floored_at_one() {
        let mut u = marine_at(0.0, 0.0);
        u.cooldown = 0;
        u.start_cooldown(-1);
        assert_eq!(u.cooldown_count, 1);
        u.cooldown = 15;
        u.start_cooldown(2);
        assert_eq!(u.cooldown_count, 18);
    }

    #[test]
    fn tick_decrements_counters_to_ready_and_stopped() {
        let mut u = marine_at(0.0, 0.0);
        u.cooldown_count = 1;
        u.motion.steps_left = 1;
        u.tick();
        assert!(u.is_ready());
        assert!(!u.is_moving());
        u.tick();
        assert_eq!(u.cooldown_count, 0);
        assert_eq!(u.motion.steps_left, 0);
    }

    #[test]
    fn take_damage_reports_death() {
        let mut u = marine_at(0.0, 0.0);
        assert!(!u.take_damage(39));
        assert!(u.take_damage(1));
        assert_eq!(u.health, 0);
    }

    #[test]
    fn danger_uses_cooldown_plus_one() {
        let mut u = marine_at(0.0, 0.0);
        u.attack = 10;
        u.cooldown = 4;
        u.health = 20;
        assert!((u.danger() - 0.1).abs() < 1e-12);
    }
}
