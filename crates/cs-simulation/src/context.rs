use cs_core::{Arena, Registry};
use rand::rngs::StdRng;

use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::listener::WorldListener;

/// Mutable world state handed to the attack and motion phases of a frame.
pub struct SimContext<'a> {
    /// Living units.
    pub registry: &'a mut Registry,
    /// The arena units move in.
    pub arena: Arena,
    /// Index of the frame being executed.
    pub frame: u64,
    /// Event log for this run.
    pub events: &'a mut EventLog,
    /// The world's random stream.
    pub rng: &'a mut StdRng,
    /// Receiver of world notifications.
    pub listener: &'a mut dyn WorldListener,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current frame.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(SimEvent::new(self.frame, kind, description));
    }
}
