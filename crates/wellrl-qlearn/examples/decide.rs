use std::io::{self, Read};

use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use wellrl_core::{encode, Decision, Policy, UserFeatures};
use wellrl_qlearn::Agent;

#[derive(Serialize)]
struct DecisionRecord {
    ts: String,
    policy: String,
    features: UserFeatures,
    decision: Decision,
}

fn iso8601_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    // Leere Eingabe: alle Merkmale auf Default.
    let features: UserFeatures = if input.trim().is_empty() {
        UserFeatures::default()
    } else {
        serde_json::from_str(&input)?
    };

    let mut policy = Agent::default();
    let decision = policy.decide(&encode(&features));

    let record = DecisionRecord {
        ts: iso8601_now(),
        policy: "wellrl-qlearn".to_string(),
        features,
        decision,
    };

    serde_json::to_writer_pretty(io::stdout(), &record)?;
    println!();

    Ok(())
}
