//! Deterministic frame-based combat simulation for csim.
//!
//! Two [`Agent`]s command opposing sides of units in a rectangular arena.
//! Every frame the [`Simulation`] builds per-side views, lets the scenario
//! decide whether the game is over, collects the agents' orders, and then
//! resolves attacks followed by motion. Given the same seed, agents, and
//! scenario, every run produces the same registry frame by frame.

/// The trait that agents implement.
pub mod agent;
/// Attack validation and resolution.
pub mod combat;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to the resolution phases.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// World notifications for renderers and recorders.
pub mod listener;
/// Movement orders and boundary collision.
pub mod motion;
/// Adaptive point quadtree.
pub mod quadtree;
/// Initial placement, termination, and scoring.
pub mod scenario;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Per-phase frame timings.
pub mod stats;
/// Per-side snapshots and agent helper queries.
pub mod view;
/// Sight and reach predicates.
pub mod visibility;

/// Re-exports of [`agent::Agent`] and [`agent::IdleAgent`].
pub use agent::{Agent, IdleAgent};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of the event log and event types.
pub use event::{EventLog, RejectReason, SimEvent, SimEventKind};
/// Re-exports of [`listener::WorldListener`] and [`listener::NullListener`].
pub use listener::{NullListener, WorldListener};
/// Re-export of [`motion::Advance`].
pub use motion::Advance;
/// Re-export of [`quadtree::SpatialIndex`].
pub use quadtree::SpatialIndex;
/// Re-exports of the scenario trait and built-in scenarios.
pub use scenario::{FixedScenario, PlainScenario, Scenario, SetupContext, scenario_by_name};
/// Re-exports of [`simulation::Simulation`] and [`simulation::Outcome`].
pub use simulation::{Outcome, Simulation};
/// Re-export of [`stats::FrameStats`].
pub use stats::FrameStats;
/// Re-export of [`view::AgentView`].
pub use view::AgentView;
