use cs_agents::{IndependentAgent, RecordingAgent, Script, ScriptedAgent, TargetPolicy};
use cs_core::Side;
use cs_simulation::{Agent, PlainScenario, SimConfig, Simulation};

type Recorded = RecordingAgent<IndependentAgent>;

fn config() -> SimConfig {
    SimConfig::default()
        .with_seed(17)
        .with_scenario_params("10 3")
        .with_split_threshold(32.0)
}

fn world(red: Box<dyn Agent>, blue: Box<dyn Agent>) -> Simulation {
    Simulation::new(config(), Box::new(PlainScenario::default()), red, blue).unwrap()
}

fn snapshot(sim: &Simulation) -> String {
    serde_json::to_string(sim.registry()).unwrap()
}

fn run_recorded(frames: u64) -> (Vec<String>, Script, Script) {
    let mut sim = world(
        Box::new(RecordingAgent::new(IndependentAgent::new(TargetPolicy::Closest, 1))),
        Box::new(RecordingAgent::new(IndependentAgent::new(TargetPolicy::Weakest, 2))),
    );
    let mut snapshots = vec![snapshot(&sim)];
    for _ in 0..frames {
        if !sim.execute_frame() {
            break;
        }
        snapshots.push(snapshot(&sim));
    }
    let red = sim.agent::<Recorded>(Side::Red).unwrap().script().clone();
    let blue = sim.agent::<Recorded>(Side::Blue).unwrap().script().clone();
    (snapshots, red, blue)
}

#[test]
fn replayed_scripts_reproduce_the_game() {
    let (recorded, red, blue) = run_recorded(500);
    assert!(!red.is_empty());
    assert!(!blue.is_empty());

    let red = Script::from_json(&red.to_json().unwrap()).unwrap();
    let blue = Script::from_json(&blue.to_json().unwrap()).unwrap();
    let mut sim = world(
        Box::new(ScriptedAgent::new(red)),
        Box::new(ScriptedAgent::new(blue)),
    );

    assert_eq!(snapshot(&sim), recorded[0]);
    for expected in &recorded[1..] {
        assert!(sim.execute_frame());
        assert_eq!(&snapshot(&sim), expected);
    }
}

#[test]
fn independent_agents_are_deterministic() {
    let (a, red_a, blue_a) = run_recorded(300);
    let (b, red_b, blue_b) = run_recorded(300);
    assert_eq!(a, b);
    assert_eq!(red_a, red_b);
    assert_eq!(blue_a, blue_b);
}

#[test]
fn independent_agents_fight_to_a_result() {
    let mut sim = world(
        Box::new(IndependentAgent::new(TargetPolicy::MostDangerous, 5)),
        Box::new(IndependentAgent::new(TargetPolicy::None, 6)),
    );
    let outcome = sim.run(5000);
    assert!(!sim.events().is_empty());
    if !outcome.timeout {
        assert_eq!(outcome.winner(), "RED-wins");
    }
}
