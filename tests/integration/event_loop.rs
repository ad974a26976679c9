//! Event scheduling driven end to end: parameter-built events against a
//! simulation clock stepped the way a play loop would.

use trajplay_rs::{Event, ParamMap};

use crate::support::ScriptedSim;

#[test]
fn param_built_event_fires_against_a_stepped_clock() {
    let mut params = ParamMap::new();
    params.insert("activity", "new filament");
    params.insert("delay", "1");

    let mut event = Event::with_params(0.0, &params, 11).unwrap();
    let mut sim = ScriptedSim::default();

    // Quarter steps are exact in binary, so the comparisons are clean.
    for step in 1..=22 {
        sim.time = f64::from(step) * 0.25;
        event.step(&mut sim).unwrap();
    }

    assert_eq!(sim.evaluated.len(), 5);
    assert!(sim.evaluated.iter().all(|a| a == "new filament"));
    assert_eq!(event.next_time(), 6.0);
    assert_eq!(sim.relax_calls, 5);
    assert_eq!(sim.unrelax_calls, 5);
}

#[test]
fn seeded_runs_replay_identically() {
    let mut params = ParamMap::new();
    params.insert("activity", "cut");
    params.insert("rate", "2.0");

    let mut first = Event::with_params(0.0, &params, 99).unwrap();
    let mut second = Event::with_params(0.0, &params, 99).unwrap();
    let mut sim_a = ScriptedSim::default();
    let mut sim_b = ScriptedSim::default();

    let mut fired_a = Vec::new();
    let mut fired_b = Vec::new();
    for step in 1..=40 {
        let now = f64::from(step) * 0.25;
        sim_a.time = now;
        sim_b.time = now;
        first.step(&mut sim_a).unwrap();
        second.step(&mut sim_b).unwrap();
        fired_a.push(sim_a.evaluated.len());
        fired_b.push(sim_b.evaluated.len());
    }

    assert_eq!(fired_a, fired_b);
    assert_eq!(first.next_time(), second.next_time());
    assert!(!sim_a.evaluated.is_empty());
}

#[test]
fn failure_surfaces_and_pauses_dynamics() {
    let mut event = Event::new(0.0, "sever", 0.0, 1.0, 5).unwrap();
    let mut sim = ScriptedSim {
        time: 3.5,
        fail_on: Some("sever".to_string()),
        ..ScriptedSim::default()
    };

    assert!(event.step(&mut sim).is_err());
    assert_eq!(sim.relax_calls, 1);
    assert_eq!(sim.unrelax_calls, 0);
    assert_eq!(event.next_time(), 2.0);

    // The failed trigger was consumed; resuming drains the rest.
    sim.fail_on = None;
    event.step(&mut sim).unwrap();
    assert_eq!(sim.evaluated, vec!["sever", "sever"]);
    assert_eq!(event.next_time(), 4.0);
    assert_eq!(sim.relax_calls, 2);
    assert_eq!(sim.unrelax_calls, 1);
}
