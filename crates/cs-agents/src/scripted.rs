use std::any::Any;
use std::collections::BTreeMap;

use cs_core::{Action, EntityId};
use cs_simulation::{Agent, AgentView};
use serde::{Deserialize, Serialize};

use crate::error::AgentResult;

/// One recorded order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// The unit the order was given to.
    pub actor: EntityId,
    /// What it was told to do.
    pub action: Action,
}

/// Orders given by one side, keyed by frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    frames: BTreeMap<u64, Vec<Order>>,
}

impl Script {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the orders for `frame`, replacing any recorded earlier. Empty
    /// order lists are not stored.
    pub fn record(&mut self, frame: u64, orders: Vec<Order>) {
        if orders.is_empty() {
            self.frames.remove(&frame);
        } else {
            self.frames.insert(frame, orders);
        }
    }

    /// Orders recorded for `frame`, in actor id order.
    pub fn orders_at(&self, frame: u64) -> &[Order] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of frames with at least one order.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no orders were recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> AgentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> AgentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wraps another agent and records every order it gives.
#[derive(Debug)]
pub struct RecordingAgent<A> {
    inner: A,
    script: Script,
}

impl<A: Agent> RecordingAgent<A> {
    /// Record the decisions of `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            script: Script::new(),
        }
    }

    /// Orders recorded so far.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The wrapped agent.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Unwrap into the recorded script.
    pub fn into_script(self) -> Script {
        self.script
    }
}

impl<A: Agent + 'static> Agent for RecordingAgent<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn on_frame(&mut self, frame: u64, own: &mut AgentView, opponent: &AgentView) {
        self.inner.on_frame(frame, own, opponent);
        let orders = own
            .actions()
            .iter()
            .map(|(&actor, &action)| Order { actor, action })
            .collect();
        self.script.record(frame, orders);
    }

    fn on_game_end(&mut self) {
        self.inner.on_game_end();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Replays a recorded [`Script`], frame by frame.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    name: String,
    script: Script,
}

impl ScriptedAgent {
    /// Replay `script`.
    pub fn new(script: Script) -> Self {
        Self {
            name: "scripted".to_string(),
            script,
        }
    }

    /// Report a different name, e.g. the name of the recorded agent.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_frame(&mut self, frame: u64, own: &mut AgentView, _opponent: &AgentView) {
        for order in self.script.orders_at(frame) {
            own.add_action(order.actor, order.action);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
