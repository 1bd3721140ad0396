use std::any::Any;

use crate::view::AgentView;

/// A decision-maker controlling one side.
///
/// Each frame the agent reads the two snapshots and records orders for its
/// own units with [`AgentView::add_action`]. It never touches the world
/// directly.
pub trait Agent: std::fmt::Debug {
    /// Human-readable name of this agent.
    fn name(&self) -> &str;

    /// Decide this frame's orders.
    ///
    /// `own` shows the agent's units and collects its actions; `opponent`
    /// shows the enemy units the side is allowed to know about.
    fn on_frame(&mut self, frame: u64, own: &mut AgentView, opponent: &AgentView);

    /// Called once when the game ends.
    fn on_game_end(&mut self) {}

    /// Downcast support for concrete agent access.
    fn as_any(&self) -> &dyn Any;
}

/// Agent that never gives an order.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleAgent;

impl Agent for IdleAgent {
    fn name(&self) -> &str {
        "idle"
    }

    fn on_frame(&mut self, _frame: u64, _own: &mut AgentView, _opponent: &AgentView) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
