use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::geometry::Vec2;

/// An order given to a single unit for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Do nothing.
    #[default]
    NoOp,
    /// Attack an enemy unit.
    Attack {
        /// The unit to attack.
        target: EntityId,
    },
    /// Move in a straight line toward a position.
    Move {
        /// Where to go.
        destination: Vec2,
    },
    /// Halt any ongoing movement.
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "noop"),
            Self::Attack { target } => write!(f, "attack {target}"),
            Self::Move { destination } => write!(f, "move to {destination}"),
            Self::Stop => write!(f, "stop"),
        }
    }
}
