use std::fmt;

use cs_core::{EntityId, Side};

/// Why an attack order was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The attacker is not alive.
    UnknownAttacker,
    /// The attacker belongs to the other side.
    NotOwner,
    /// The attacker's cooldown has not expired.
    CoolingDown,
    /// The target is not alive.
    UnknownTarget,
    /// The target is on the attacker's side.
    SameSide,
    /// The target is outside the attacker's range.
    OutOfRange,
    /// Fog of war hides the target from the attacker's side.
    NotVisible,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownAttacker => "unknown attacker",
            Self::NotOwner => "attacker not owned by side",
            Self::CoolingDown => "attacker cooling down",
            Self::UnknownTarget => "unknown target",
            Self::SameSide => "target on same side",
            Self::OutOfRange => "target out of range",
            Self::NotVisible => "target not visible",
        };
        f.write_str(text)
    }
}

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Combat
    /// An attack was applied.
    Attack {
        /// The attacking unit.
        attacker: EntityId,
        /// The unit that took damage.
        target: EntityId,
        /// Damage dealt.
        damage: i32,
    },
    /// An attack order failed validation and had no effect.
    AttackRejected {
        /// The unit named as attacker.
        attacker: EntityId,
        /// The unit named as target.
        target: EntityId,
        /// Why the order was ignored.
        reason: RejectReason,
    },
    /// A unit's health dropped to zero or below and it was removed.
    Killed {
        /// The unit that died.
        entity: EntityId,
        /// The side it belonged to.
        side: Side,
    },

    // Motion
    /// A move order could not be started.
    MoveRejected {
        /// The unit that was ordered to move.
        entity: EntityId,
    },
    /// A moving unit hit the arena border and stopped.
    BorderCollision {
        /// The unit that collided.
        entity: EntityId,
    },

    // Lifecycle
    /// The scenario declared the game over.
    GameEnded {
        /// Living units per side, indexed by [`Side::index`].
        survivors: [usize; 2],
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Attack {
                attacker, target, ..
            }
            | Self::AttackRejected {
                attacker, target, ..
            } => *attacker == id || *target == id,
            Self::Killed { entity, .. }
            | Self::MoveRejected { entity }
            | Self::BorderCollision { entity } => *entity == id,
            Self::GameEnded { .. } => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The frame when this event occurred.
    pub frame: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given frame, kind, and description.
    pub fn new(frame: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            frame,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn killed(id: u32) -> SimEventKind {
        SimEventKind::Killed {
            entity: EntityId(id),
            side: Side::Blue,
        }
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, killed(7), "blue marine #7 died"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_for_entity(EntityId(7)).len(), 1);
        assert!(log.events_for_entity(EntityId(8)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(SimEvent::new(i, killed(1), "test"));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].frame, 3);
        assert_eq!(log.events()[1].frame, 4);
    }

    #[test]
    fn event_kind_involves_entity() {
        let (a, b, c) = (EntityId(1), EntityId(2), EntityId(3));

        let kind = SimEventKind::Attack {
            attacker: a,
            target: b,
            damage: 6,
        };
        assert!(kind.involves(a));
        assert!(kind.involves(b));
        assert!(!kind.involves(c));

        let kind = SimEventKind::AttackRejected {
            attacker: a,
            target: b,
            reason: RejectReason::OutOfRange,
        };
        assert!(kind.involves(b));

        assert!(SimEventKind::BorderCollision { entity: c }.involves(c));
        assert!(!SimEventKind::GameEnded { survivors: [1, 0] }.involves(a));
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, killed(1), "test"));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn reject_reason_display() {
        assert_eq!(RejectReason::NotVisible.to_string(), "target not visible");
        assert_eq!(RejectReason::CoolingDown.to_string(), "attacker cooling down");
    }
}
