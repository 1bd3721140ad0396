//! Initial placement, termination, and scoring rules.

use cs_core::{Arena, Registry, Side, UnitCatalog, UnitType, Vec2};
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::{SimError, SimResult};

/// What a scenario gets to work with while populating the world.
pub struct SetupContext<'a> {
    /// Registry to spawn units into.
    pub registry: &'a mut Registry,
    /// The arena.
    pub arena: Arena,
    /// Scenario parameter string from the configuration.
    pub params: &'a str,
    /// The world's random stream.
    pub rng: &'a mut StdRng,
}

/// Rules of a game: who starts where, when it ends, and who won.
pub trait Scenario: std::fmt::Debug {
    /// Name of this scenario.
    fn name(&self) -> &str;

    /// Spawn the initial units. Every unit must fit inside the arena.
    fn populate(&mut self, ctx: &mut SetupContext<'_>) -> SimResult<()>;

    /// Whether the game is over. The default ends it once a side is wiped out.
    fn is_finished(&self, registry: &Registry) -> bool {
        let [red, blue] = registry.count_by_side();
        red == 0 || blue == 0
    }

    /// Result from Red's point of view: 1 win, 0 draw, -1 loss.
    ///
    /// The default compares survivors: a side with units left beats a side
    /// without. A timeout with both sides alive is a draw.
    fn score(&self, registry: &Registry, _timeout: bool) -> i32 {
        match registry.count_by_side() {
            [0, 0] => 0,
            [_, 0] => 1,
            [0, _] => -1,
            _ => 0,
        }
    }
}

/// Scenario names accepted by [`scenario_by_name`].
pub const SCENARIOS: &[&str] = &["plain"];

/// Look up a built-in scenario by name (case-insensitive).
pub fn scenario_by_name(name: &str, catalog: UnitCatalog) -> SimResult<Box<dyn Scenario>> {
    match name.to_ascii_lowercase().as_str() {
        "plain" => Ok(Box::new(PlainScenario::new(catalog))),
        other => Err(SimError::Config(format!(
            "unknown scenario '{other}' (available: {})",
            SCENARIOS.join(", ")
        ))),
    }
}

// ---------------------------------------------------------------------------
// Plain
// ---------------------------------------------------------------------------

/// Mirrored open-field battle of marines and tanks.
///
/// Parameters are `"<marines> <tanks>"`. Each Red unit is placed at a random
/// position and its Blue twin at the point reflected through the arena center.
#[derive(Debug, Clone, Default)]
pub struct PlainScenario {
    catalog: UnitCatalog,
}

impl PlainScenario {
    /// Create the scenario drawing unit types from `catalog`.
    pub fn new(catalog: UnitCatalog) -> Self {
        Self { catalog }
    }

    fn error(&self, reason: impl Into<String>) -> SimError {
        SimError::Scenario {
            scenario: self.name().to_string(),
            reason: reason.into(),
        }
    }

    /// Parse `"<marines> <tanks>"`.
    pub fn parse_params(&self, params: &str) -> SimResult<(u32, u32)> {
        let counts = params
            .split_whitespace()
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|e| self.error(format!("bad unit count '{p}': {e}")))
            })
            .collect::<SimResult<Vec<u32>>>()?;
        match counts[..] {
            [0, 0] => Err(self.error("at least one unit per side is required")),
            [marines, tanks] => Ok((marines, tanks)),
            _ => Err(self.error(format!(
                "expected '<marines> <tanks>', got '{params}'"
            ))),
        }
    }

    fn place_pairs(ctx: &mut SetupContext<'_>, unit_type: &UnitType, count: u32) -> SimResult<()> {
        let span = 2.2 * unit_type.radius;
        if count > 0 && (ctx.arena.width <= span || ctx.arena.height <= span) {
            return Err(SimError::Config(format!(
                "{} of radius {} does not fit in a {}x{} arena",
                unit_type.name, unit_type.radius, ctx.arena.width, ctx.arena.height
            )));
        }
        for _ in 0..count {
            let pos = ctx.arena.random_position(unit_type.radius, ctx.rng);
            ctx.registry.spawn(unit_type, Side::Red, pos);
            ctx.registry.spawn(unit_type, Side::Blue, ctx.arena.mirror(pos));
        }
        Ok(())
    }
}

impl Scenario for PlainScenario {
    fn name(&self) -> &str {
        "plain"
    }

    fn populate(&mut self, ctx: &mut SetupContext<'_>) -> SimResult<()> {
        let (marines, tanks) = self.parse_params(ctx.params)?;
        let marine = self.catalog.get("marine")?;
        let tank = self.catalog.get("tank")?;
        Self::place_pairs(ctx, marine, marines)?;
        Self::place_pairs(ctx, tank, tanks)?;
        debug!(marines, tanks, "plain scenario populated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixed
// ---------------------------------------------------------------------------

/// A unit to place at an exact position.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Unit template.
    pub unit_type: UnitType,
    /// Owning side.
    pub side: Side,
    /// Center position.
    pub pos: Vec2,
}

/// Scenario that spawns a fixed list of units in order and ignores its
/// parameter string. Useful for tests and hand-built engagements.
#[derive(Debug, Clone, Default)]
pub struct FixedScenario {
    placements: Vec<Placement>,
}

impl FixedScenario {
    /// An empty placement list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit; ids follow insertion order starting at 1.
    pub fn with_unit(mut self, unit_type: UnitType, side: Side, pos: Vec2) -> Self {
        self.placements.push(Placement {
            unit_type,
            side,
            pos,
        });
        self
    }
}

impl Scenario for FixedScenario {
    fn name(&self) -> &str {
        "fixed"
    }

    fn populate(&mut self, ctx: &mut SetupContext<'_>) -> SimResult<()> {
        for p in &self.placements {
            p.unit_type.validate()?;
            if !ctx.arena.contains_circle(p.pos, p.unit_type.radius) {
                return Err(SimError::Scenario {
                    scenario: self.name().to_string(),
                    reason: format!("{} at {} does not fit in the arena", p.unit_type.name, p.pos),
                });
            }
            ctx.registry.spawn(&p.unit_type, p.side, p.pos);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn populate(scenario: &mut dyn Scenario, params: &str) -> SimResult<Registry> {
        let mut registry = Registry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = SetupContext {
            registry: &mut registry,
            arena: Arena::new(800.0, 600.0),
            params,
            rng: &mut rng,
        };
        scenario.populate(&mut ctx)?;
        Ok(registry)
    }

    #[test]
    fn plain_places_mirrored_pairs() {
        let registry = populate(&mut PlainScenario::default(), "3 2").unwrap();
        assert_eq!(registry.count_by_side(), [5, 5]);

        let units: Vec<_> = registry.iter().collect();
        for pair in units.chunks(2) {
            let (red, blue) = (pair[0], pair[1]);
            assert_eq!(red.side, Side::Red);
            assert_eq!(blue.side, Side::Blue);
            assert_eq!(red.kind, blue.kind);
            assert_eq!(blue.pos, Arena::new(800.0, 600.0).mirror(red.pos));
            assert!(Arena::new(800.0, 600.0).contains_circle(red.pos, red.radius));
        }
        assert_eq!(units[9].kind, "tank");
    }

    #[test]
    fn plain_rejects_malformed_params() {
        for params in ["", "3", "1 2 3", "a b", "-1 2", "0 0"] {
            assert!(
                populate(&mut PlainScenario::default(), params).is_err(),
                "params {params:?} should be rejected"
            );
        }
    }

    #[test]
    fn plain_requires_catalog_types() {
        let catalog = UnitCatalog::from_types([UnitType::marine()]);
        let err = populate(&mut PlainScenario::new(catalog), "1 1").unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn default_termination_and_score() {
        let scenario = PlainScenario::default();
        let mut registry = Registry::new();
        assert!(scenario.is_finished(&registry));
        assert_eq!(scenario.score(&registry, false), 0);

        registry.spawn(&UnitType::marine(), Side::Red, Vec2::new(50.0, 50.0));
        assert!(scenario.is_finished(&registry));
        assert_eq!(scenario.score(&registry, false), 1);

        let blue = registry.spawn(&UnitType::marine(), Side::Blue, Vec2::new(60.0, 50.0));
        assert!(!scenario.is_finished(&registry));
        assert_eq!(scenario.score(&registry, true), 0);

        registry.remove(blue).unwrap();
        registry.remove(cs_core::EntityId(1)).unwrap();
        registry.spawn(&UnitType::tank(), Side::Blue, Vec2::new(60.0, 50.0));
        assert_eq!(scenario.score(&registry, false), -1);
    }

    #[test]
    fn fixed_spawns_in_order_and_checks_bounds() {
        let mut scenario = FixedScenario::new()
            .with_unit(UnitType::marine(), Side::Red, Vec2::new(20.0, 20.0))
            .with_unit(UnitType::tank(), Side::Blue, Vec2::new(100.0, 100.0));
        let registry = populate(&mut scenario, "ignored").unwrap();
        assert_eq!(registry.get(cs_core::EntityId(2)).unwrap().kind, "tank");

        let mut outside =
            FixedScenario::new().with_unit(UnitType::tank(), Side::Red, Vec2::new(5.0, 5.0));
        assert!(populate(&mut outside, "").is_err());
    }

    #[test]
    fn scenario_lookup() {
        assert_eq!(scenario_by_name("Plain", UnitCatalog::standard()).unwrap().name(), "plain");
        assert!(scenario_by_name("desert", UnitCatalog::standard()).is_err());
    }
}
