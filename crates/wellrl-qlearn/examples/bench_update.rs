use std::time::Instant;

use wellrl_core::{encode, Action, UserFeatures};
use wellrl_qlearn::{Agent, SharedAgent};

fn main() {
    let mut agent = Agent::default();
    let state = encode(&UserFeatures::default());
    let next = encode(&UserFeatures {
        engagement: Some(0.8),
        ..UserFeatures::default()
    });

    let iterations: u32 = 1_000_000;

    // Warmup
    for _ in 0..1000 {
        agent.update(&state, Action::Maintain, 0.5, &next);
    }

    let start = Instant::now();
    for _ in 0..iterations {
        agent.update(&state, Action::Maintain, 0.5, &next);
    }
    let duration = start.elapsed();
    println!("Update on EXISTING row took: {duration:?}");
    println!("Average per call: {:?}", duration / iterations);

    // Jeder Schlüssel des Zustandsraums einmal: legt alle Zeilen an.
    let mut agent = Agent::default();
    let mut rows: u32 = 0;
    let start = Instant::now();
    for age in 0..6 {
        for anxiety in 0..5 {
            for activity in 0..8 {
                for engagement in 0..=10 {
                    let key = format!("{age}|0|2|{anxiety}|{activity}|{engagement}|4");
                    if let Ok(s) = key.parse() {
                        agent.update(&s, Action::IncreaseIntensity, 0.1, &next);
                        rows += 1;
                    }
                }
            }
        }
    }
    let duration = start.elapsed();
    println!("Update creating {rows} rows took: {duration:?}");
    println!("Average per call: {:?}", duration / rows.max(1));

    let shared = SharedAgent::new(agent);
    let start = Instant::now();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..iterations / 4 {
                    shared.train_step(&state, Action::Maintain, 0.5, &next);
                }
            });
        }
    });
    let duration = start.elapsed();
    println!("Contended train_step (4 threads) took: {duration:?}");
    println!("Average per call: {:?}", duration / iterations);
}
