//! Built-in agents for csim.
//!
//! [`IndependentAgent`] drives each unit on its own with one of the
//! [`TargetPolicy`] strategies. [`RecordingAgent`] and [`ScriptedAgent`]
//! capture and replay the orders of any agent.

/// Error types for agent construction.
pub mod error;
/// The independent-control agent.
pub mod independent;
/// Targeting policies and their selector strategies.
pub mod policy;
/// Order recording and replay.
pub mod scripted;

use cs_simulation::{Agent, IdleAgent};

/// Re-exports of [`error::AgentError`] and [`error::AgentResult`].
pub use error::{AgentError, AgentResult};
/// Re-export of [`independent::IndependentAgent`].
pub use independent::IndependentAgent;
/// Re-exports of [`policy::TargetPolicy`] and [`policy::TargetSelector`].
pub use policy::{TargetPolicy, TargetSelector};
/// Re-exports of the script types and agents.
pub use scripted::{Order, RecordingAgent, Script, ScriptedAgent};

/// Build an agent from a command-line name.
///
/// `"idle"` gives an agent that never acts; any [`TargetPolicy`] name gives
/// an [`IndependentAgent`] seeded with `seed` that indexes the opponent with
/// split threshold `eps`.
pub fn agent_from_name(name: &str, seed: u64, eps: f64) -> AgentResult<Box<dyn Agent>> {
    if name.eq_ignore_ascii_case("idle") {
        return Ok(Box::new(IdleAgent));
    }
    let policy: TargetPolicy = name.parse()?;
    Ok(Box::new(
        IndependentAgent::new(policy, seed).with_split_threshold(eps),
    ))
}
