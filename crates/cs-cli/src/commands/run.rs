use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Args;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::info;

use cs_core::{EntityId, Registry, Side};
use cs_simulation::{SimConfig, SimEventKind, Simulation, scenario_by_name};

/// Frame limit used when `--steps` is negative.
const MAX_STEPS: u64 = 100_000;

/// Options of `csim run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Arena width
    #[arg(long, default_value = "800")]
    pub width: f64,

    /// Arena height
    #[arg(long, default_value = "800")]
    pub height: f64,

    /// Enable fog of war
    #[arg(long)]
    pub fow: bool,

    /// Quadtree split threshold (<= 0 disables the index)
    #[arg(long, default_value = "800")]
    pub eps: f64,

    /// RNG seed (0 picks one from the clock)
    #[arg(short, long, default_value = "0")]
    pub seed: u64,

    /// Scenario name
    #[arg(long, default_value = "plain")]
    pub scenario: String,

    /// Scenario parameters, e.g. "<marines> <tanks>"
    #[arg(short, long, default_value = "100 100")]
    pub params: String,

    /// Red agent: idle, none, closest, weakest, most_dangerous
    #[arg(long, default_value = "closest")]
    pub red: String,

    /// Blue agent: idle, none, closest, weakest, most_dangerous
    #[arg(long, default_value = "closest")]
    pub blue: String,

    /// Frame limit (negative: run until decided, up to 100000 frames)
    #[arg(long, default_value = "-1", allow_negative_numbers = true)]
    pub steps: i64,

    /// JSON file with a unit type table
    #[arg(short, long)]
    pub units: Option<PathBuf>,

    /// Print every logged event
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print events involving this unit id (implies --verbose)
    #[arg(long)]
    pub entity: Option<u32>,

    /// Print phase timings every N frames (0 = never)
    #[arg(long, default_value = "100")]
    pub report_every: u64,
}

pub fn run(args: &RunArgs) -> Result<(), String> {
    let catalog = super::load_catalog(args.units.as_deref())?;
    let seed = if args.seed == 0 { clock_seed() } else { args.seed };
    let max_steps = u64::try_from(args.steps).map_or(MAX_STEPS, |s| s.min(MAX_STEPS));
    if args.seed == 0 {
        info!(seed, max_steps, "seeded from clock");
    }

    let config = SimConfig::default()
        .with_arena(args.width, args.height)
        .with_fog_of_war(args.fow)
        .with_split_threshold(args.eps)
        .with_seed(seed)
        .with_scenario_params(args.params.as_str());

    let scenario = scenario_by_name(&args.scenario, catalog).map_err(|e| e.to_string())?;
    let red = cs_agents::agent_from_name(&args.red, seed.wrapping_add(1), args.eps)
        .map_err(|e| format!("red agent: {e}"))?;
    let blue = cs_agents::agent_from_name(&args.blue, seed.wrapping_add(2), args.eps)
        .map_err(|e| format!("blue agent: {e}"))?;
    let names = [red.name().to_string(), blue.name().to_string()];

    let mut sim = Simulation::new(config, scenario, red, blue)
        .map_err(|e| format!("simulation setup failed: {e}"))?;

    // Header
    println!(
        "  {} {} vs {} {}",
        "Battle".bold(),
        names[0].red(),
        names[1].blue(),
        format!(
            "({}x{}, params \"{}\", seed={seed}, eps={}, fow={})",
            args.width, args.height, args.params, args.eps, args.fow
        )
        .dimmed()
    );
    let start = sim.registry().count_by_side();
    println!("  {} red units, {} blue units", start[0], start[1]);
    println!();

    while sim.frame() < max_steps && sim.execute_frame() {
        if args.report_every > 0 && sim.frame() % args.report_every == 0 {
            let alive = sim.registry().count_by_side();
            println!(
                "  {} {} {}",
                format!("[frame {:>6}]", sim.frame()).dimmed(),
                format!("{}/{}", alive[0], alive[1]).bold(),
                sim.stats()
            );
        }
    }
    // The loop above stops at the limit without ending the game; this
    // scores it and records the timeout.
    let outcome = sim.run(max_steps);

    if args.verbose || args.entity.is_some() {
        let events = match args.entity {
            Some(id) => sim.events().events_for_entity(EntityId(id)),
            None => sim.events().events().iter().collect(),
        };
        println!();
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in &events {
            let label = format!("[frame {:>6}]", event.frame).dimmed();
            println!("  {label} {}", colorize_event(&event.kind, &event.description));
        }
        if events.is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
    }

    println!();
    println!("  {}", "Survivors".bold().underline());
    println!();
    println!("{}", survivor_table(sim.registry(), &names));
    println!();
    println!("  {}", sim.stats().to_string().dimmed());
    println!("### {outcome}");

    Ok(())
}

fn survivor_table(registry: &Registry, names: &[String; 2]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Side", "Agent", "Units", "Health"]);

    for side in Side::ALL {
        let units: Vec<_> = registry.by_side(side).collect();
        let health: i64 = units.iter().map(|e| i64::from(e.health)).sum();
        let max: i64 = units.iter().map(|e| i64::from(e.max_health)).sum();
        table.add_row(vec![
            side.to_string(),
            names[side.index()].clone(),
            units.len().to_string(),
            format!("{health}/{max}"),
        ]);
    }
    table
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Killed { .. } => description.red().bold(),
        SimEventKind::Attack { .. } => description.normal(),
        SimEventKind::AttackRejected { .. } | SimEventKind::MoveRejected { .. } => {
            description.yellow()
        }
        SimEventKind::BorderCollision { .. } => description.blue(),
        SimEventKind::GameEnded { .. } => description.green().bold(),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |d| d.as_secs().max(1))
}
