use std::ops::RangeInclusive;

use cs_core::Arena;

use crate::error::{SimError, SimResult};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Arena width.
    pub width: f64,
    /// Arena height.
    pub height: f64,
    /// Restrict each side's view of the enemy to what its units can see.
    pub fog_of_war: bool,
    /// Quadtree leaf split threshold. Values `<= 0` disable the index.
    pub split_threshold: f64,
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Free-form parameters interpreted by the scenario (e.g. unit counts).
    pub scenario_params: String,
    /// Random offset in frames added to each attack cooldown.
    pub cooldown_jitter: RangeInclusive<i32>,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            fog_of_war: false,
            split_threshold: 800.0,
            seed: 42,
            scenario_params: "100 100".to_string(),
            cooldown_jitter: -1..=2,
            max_events: 10_000,
        }
    }
}

impl SimConfig {
    /// Set the arena dimensions.
    pub fn with_arena(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable fog of war.
    pub fn with_fog_of_war(mut self, fog: bool) -> Self {
        self.fog_of_war = fog;
        self
    }

    /// Set the quadtree split threshold (`<= 0` disables the index).
    pub fn with_split_threshold(mut self, eps: f64) -> Self {
        self.split_threshold = eps;
        self
    }

    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the scenario parameter string.
    pub fn with_scenario_params(mut self, params: impl Into<String>) -> Self {
        self.scenario_params = params.into();
        self
    }

    /// Set the inclusive range of cooldown jitter in frames.
    pub fn with_cooldown_jitter(mut self, jitter: RangeInclusive<i32>) -> Self {
        self.cooldown_jitter = jitter;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// The arena described by this configuration.
    pub fn arena(&self) -> Arena {
        Arena::new(self.width, self.height)
    }

    /// Check the settings before a world is built from them.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SimError::Config(format!(
                "arena width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SimError::Config(format!(
                "arena height must be positive, got {}",
                self.height
            )));
        }
        if self.split_threshold.is_nan() {
            return Err(SimError::Config("split threshold is NaN".into()));
        }
        if self.cooldown_jitter.is_empty() {
            return Err(SimError::Config(format!(
                "empty cooldown jitter range {:?}",
                self.cooldown_jitter
            )));
        }
        Ok(())
    }
}
