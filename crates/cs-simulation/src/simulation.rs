use std::fmt;
use std::time::Instant;

use cs_core::{Arena, Registry, Side};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::agent::Agent;
use crate::combat;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::listener::{NullListener, WorldListener};
use crate::motion;
use crate::scenario::{Scenario, SetupContext};
use crate::stats::FrameStats;
use crate::view::AgentView;
use crate::visibility;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Frames executed.
    pub frames: u64,
    /// Result from Red's point of view: 1 win, 0 draw, -1 loss.
    pub red_score: i32,
    /// Whether the frame limit was reached before the scenario ended the game.
    pub timeout: bool,
}

impl Outcome {
    /// `"RED-wins"`, `"BLUE-wins"`, or `"tie"`.
    pub fn winner(&self) -> &'static str {
        match self.red_score {
            s if s > 0 => "RED-wins",
            s if s < 0 => "BLUE-wins",
            _ => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "game over after {} step(s) ; RED score: {} ; {}",
            self.frames,
            self.red_score,
            self.winner()
        )?;
        if self.timeout {
            write!(f, " ; timeout")?;
        }
        Ok(())
    }
}

/// The world and its frame loop.
///
/// Owns the unit registry, the world RNG, the event log, both agents, and
/// the per-frame views. Each frame runs view computation, the termination
/// check, agent decisions, attack resolution, and motion resolution, in that
/// order.
pub struct Simulation {
    config: SimConfig,
    registry: Registry,
    rng: StdRng,
    events: EventLog,
    scenario: Box<dyn Scenario>,
    agents: [Box<dyn Agent>; 2],
    listener: Box<dyn WorldListener>,
    self_views: [AgentView; 2],
    opponent_views: [AgentView; 2],
    frame: u64,
    finished: bool,
    timed_out: bool,
    stats: FrameStats,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("frame", &self.frame)
            .field("scenario", &self.scenario.name())
            .field("red", &self.agents[0].name())
            .field("blue", &self.agents[1].name())
            .field("units", &self.registry.len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Simulation {
    /// Validate the configuration and let the scenario populate a new world.
    ///
    /// Fails without building anything if the configuration is invalid, the
    /// scenario rejects its parameters, or a placed unit does not fit in the
    /// arena.
    pub fn new(
        config: SimConfig,
        mut scenario: Box<dyn Scenario>,
        red: Box<dyn Agent>,
        blue: Box<dyn Agent>,
    ) -> SimResult<Self> {
        config.validate()?;
        let arena = config.arena();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut registry = Registry::new();
        scenario.populate(&mut SetupContext {
            registry: &mut registry,
            arena,
            params: &config.scenario_params,
            rng: &mut rng,
        })?;
        if let Some(u) = registry
            .iter()
            .find(|u| !arena.contains_circle(u.pos, u.radius))
        {
            return Err(SimError::Scenario {
                scenario: scenario.name().to_string(),
                reason: format!("{u} lies outside the arena"),
            });
        }

        info!(
            scenario = scenario.name(),
            red = red.name(),
            blue = blue.name(),
            units = registry.len(),
            seed = config.seed,
            "world ready"
        );

        Ok(Self {
            events: EventLog::new(config.max_events),
            self_views: Side::ALL.map(|s| AgentView::new(s, arena)),
            opponent_views: Side::ALL.map(|s| AgentView::new(s.opponent(), arena)),
            config,
            registry,
            rng,
            scenario,
            agents: [red, blue],
            listener: Box::new(NullListener),
            frame: 0,
            finished: false,
            timed_out: false,
            stats: FrameStats::default(),
        })
    }

    /// Replace the world listener.
    pub fn set_listener<L: WorldListener + 'static>(&mut self, listener: L) {
        self.listener = Box::new(listener);
    }

    /// Builder form of [`Self::set_listener`].
    pub fn with_listener<L: WorldListener + 'static>(mut self, listener: L) -> Self {
        self.set_listener(listener);
        self
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    /// Run one frame. Returns `false` once the game is over; later calls do
    /// nothing and keep returning `false`.
    pub fn execute_frame(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let started = Instant::now();
        self.compute_views();
        self.stats.views.record(started.elapsed());

        if self.scenario.is_finished(&self.registry) {
            self.end_game();
            return false;
        }

        self.listener.frame_started(self.frame);
        for side in Side::ALL {
            let i = side.index();
            let started = Instant::now();
            self.agents[i].on_frame(self.frame, &mut self.self_views[i], &self.opponent_views[i]);
            self.stats.agents[i].record(started.elapsed());
        }

        let mut ctx = SimContext {
            registry: &mut self.registry,
            arena: self.config.arena(),
            frame: self.frame,
            events: &mut self.events,
            rng: &mut self.rng,
            listener: &mut *self.listener,
        };

        let started = Instant::now();
        combat::resolve_attacks(
            &mut ctx,
            &self.self_views,
            self.config.fog_of_war,
            &self.config.cooldown_jitter,
        );
        self.stats.attacks.record(started.elapsed());

        let started = Instant::now();
        motion::resolve_motion(&mut ctx, &self.self_views);
        self.stats.motion.record(started.elapsed());

        self.frame += 1;
        true
    }

    /// Run frames until the game ends or `max_frames` frames have executed.
    ///
    /// Hitting the limit ends the game as a timeout; agents and the listener
    /// are told the game ended either way.
    pub fn run(&mut self, max_frames: u64) -> Outcome {
        while self.frame < max_frames && self.execute_frame() {}
        if !self.finished {
            self.timed_out = true;
            self.end_game();
        }
        self.outcome()
    }

    /// Score the current state. `timeout` is only set once [`Self::run`]
    /// stopped at its frame limit.
    pub fn outcome(&self) -> Outcome {
        Outcome {
            frames: self.frame,
            red_score: self.scenario.score(&self.registry, self.timed_out),
            timeout: self.timed_out,
        }
    }

    fn compute_views(&mut self) {
        let arena = self.config.arena();
        let mut own = Side::ALL.map(|s| AgentView::new(s, arena));
        for u in self.registry.iter() {
            own[u.side.index()].push_unit(u.clone());
        }

        let opponent = if self.config.fog_of_war {
            let eps = self.config.split_threshold;
            Side::ALL.map(|s| {
                let enemy = s.opponent();
                let seen = visibility::visible_enemies(
                    own[s.index()].units(),
                    own[enemy.index()].units(),
                    arena,
                    eps,
                );
                AgentView::with_units(enemy, arena, seen)
            })
        } else {
            [own[1].clone(), own[0].clone()]
        };

        self.self_views = own;
        self.opponent_views = opponent;
    }

    fn end_game(&mut self) {
        self.finished = true;
        let survivors = self.registry.count_by_side();
        info!(
            frame = self.frame,
            red = survivors[0],
            blue = survivors[1],
            timeout = self.timed_out,
            "game over"
        );
        self.events.push(SimEvent::new(
            self.frame,
            SimEventKind::GameEnded { survivors },
            format!(
                "game ended with {} red and {} blue units",
                survivors[0], survivors[1]
            ),
        ));
        self.listener.game_ended();
        for agent in &mut self.agents {
            agent.on_game_end();
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The configuration the world was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The arena.
    pub fn arena(&self) -> Arena {
        self.config.arena()
    }

    /// Living units.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Number of frames executed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether the game is over.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Phase timings of the frames run so far.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// `side`'s own view from the latest frame, including its orders.
    pub fn self_view(&self, side: Side) -> &AgentView {
        &self.self_views[side.index()]
    }

    /// What `side` was shown of its opponent in the latest frame.
    pub fn opponent_view(&self, side: Side) -> &AgentView {
        &self.opponent_views[side.index()]
    }

    /// Access an agent by downcasting to a concrete type.
    pub fn agent<T: Agent + 'static>(&self, side: Side) -> Option<&T> {
        self.agents[side.index()].as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::IdleAgent;
    use crate::scenario::{FixedScenario, PlainScenario};
    use cs_core::{UnitType, Vec2};

    fn duel() -> FixedScenario {
        FixedScenario::new()
            .with_unit(UnitType::marine(), Side::Red, Vec2::new(100.0, 100.0))
            .with_unit(UnitType::marine(), Side::Blue, Vec2::new(700.0, 700.0))
    }

    fn idle_sim(config: SimConfig, scenario: impl Scenario + 'static) -> SimResult<Simulation> {
        Simulation::new(
            config,
            Box::new(scenario),
            Box::new(IdleAgent),
            Box::new(IdleAgent),
        )
    }

    #[test]
    fn outcome_labels() {
        let mut o = Outcome {
            frames: 3,
            red_score: 1,
            timeout: false,
        };
        assert_eq!(o.winner(), "RED-wins");
        assert_eq!(o.to_string(), "game over after 3 step(s) ; RED score: 1 ; RED-wins");
        o.red_score = -1;
        assert_eq!(o.winner(), "BLUE-wins");
        o.red_score = 0;
        o.timeout = true;
        assert_eq!(o.to_string(), "game over after 3 step(s) ; RED score: 0 ; tie ; timeout");
    }

    #[test]
    fn invalid_config_builds_nothing() {
        let err = idle_sim(SimConfig::default().with_arena(-1.0, 10.0), duel()).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));

        let err = idle_sim(
            SimConfig::default().with_scenario_params("lots"),
            PlainScenario::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Scenario { .. }));
    }

    #[test]
    fn idle_agents_time_out() {
        let mut sim = idle_sim(SimConfig::default(), duel()).unwrap();
        let outcome = sim.run(25);
        assert_eq!(outcome.frames, 25);
        assert!(outcome.timeout);
        assert_eq!(outcome.winner(), "tie");
        assert!(sim.is_finished());
        assert!(!sim.execute_frame());
        assert_eq!(sim.frame(), 25);
        assert_eq!(sim.stats().views.samples(), 25);
    }

    #[test]
    fn one_sided_world_ends_immediately() {
        let scenario =
            FixedScenario::new().with_unit(UnitType::tank(), Side::Red, Vec2::new(50.0, 50.0));
        let mut sim = idle_sim(SimConfig::default(), scenario).unwrap();
        assert!(!sim.execute_frame());
        let outcome = sim.outcome();
        assert_eq!(outcome.frames, 0);
        assert!(!outcome.timeout);
        assert_eq!(outcome.red_score, 1);
        assert_eq!(sim.events().len(), 1);
    }

    #[test]
    fn views_mirror_without_fog() {
        let mut sim = idle_sim(SimConfig::default(), duel()).unwrap();
        assert!(sim.execute_frame());
        assert_eq!(sim.self_view(Side::Red).len(), 1);
        assert_eq!(sim.opponent_view(Side::Red).side(), Side::Blue);
        assert_eq!(sim.opponent_view(Side::Red).units(), sim.self_view(Side::Blue).units());
    }

    #[test]
    fn fog_hides_distant_enemies() {
        let mut sim = idle_sim(SimConfig::default().with_fog_of_war(true), duel()).unwrap();
        assert!(sim.execute_frame());
        assert!(sim.opponent_view(Side::Red).is_empty());
        assert!(sim.opponent_view(Side::Blue).is_empty());
    }

    #[test]
    fn agent_downcast() {
        let sim = idle_sim(SimConfig::default(), duel()).unwrap();
        assert!(sim.agent::<IdleAgent>(Side::Red).is_some());
    }
}
