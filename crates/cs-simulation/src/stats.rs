use std::fmt;
use std::time::Duration;

/// Accumulated wall-clock time of one frame phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimer {
    total: Duration,
    samples: u32,
}

impl PhaseTimer {
    /// Add one measurement.
    pub fn record(&mut self, elapsed: Duration) {
        self.total += elapsed;
        self.samples += 1;
    }

    /// Number of measurements.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Sum of all measurements.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Mean measurement in milliseconds, 0 before the first sample.
    pub fn average_millis(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1000.0 / f64::from(self.samples)
    }
}

/// Per-phase timings of the frames run so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Building the four views.
    pub views: PhaseTimer,
    /// Agent decisions, indexed by side.
    pub agents: [PhaseTimer; 2],
    /// Attack resolution.
    pub attacks: PhaseTimer,
    /// Motion resolution.
    pub motion: PhaseTimer,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "views {:.3}ms | red {:.3}ms | blue {:.3}ms | attacks {:.3}ms | motion {:.3}ms",
            self.views.average_millis(),
            self.agents[0].average_millis(),
            self.agents[1].average_millis(),
            self.attacks.average_millis(),
            self.motion.average_millis(),
        )
    }
}
