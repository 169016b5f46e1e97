//! Integrationstest für das Beispiel `encode_states.rs`.
//!
//! Erwartung: eine Zeile pro Eingabeobjekt, Schlüssel im Format `a|g|b|x|y|e|s`,
//! fehlende Merkmale mit Defaults.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_temp_jsonl() -> std::path::PathBuf {
    let tmp =
        std::env::temp_dir().join(format!("wellrl_encode_test_{}.jsonl", std::process::id()));
    fs::write(
        &tmp,
        r#"{"age":35,"gender":1,"bmi":25.9,"anxiety_score":12,"activity_days":3,"engagement":0.55,"segment":"Moderate Anxiety, Moderate Activity"}
{}"#,
    )
    .unwrap_or_else(|e| panic!("Fehler beim Schreiben der temporären JSONL-Datei: {e}"));
    tmp
}

#[test]
fn example_encode_states_prints_keys() {
    let path = write_temp_jsonl();
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--package",
        "wellrl-core",
        "--example",
        "encode_states",
        "--",
        path.to_str()
            .unwrap_or_else(|| panic!("Temporärer Pfad ist kein valides UTF-8: {path:?}")),
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3|1|2|2|3|5|1\tModerate Anxiety, Moderate Activity"))
        .stdout(predicate::str::contains("3|0|2|2|3|5|4\tWellness Seekers"));
}

#[test]
fn example_encode_states_keys_parse_back() {
    let input = r#"{"age":150,"bmi":80,"anxiety_score":21,"activity_week":12,"engagement":1.0}"#;

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--package", "wellrl-core", "--example", "encode_states"]);
    cmd.write_stdin(input);
    let output = cmd.assert().success().get_output().stdout.clone();

    let out_str = String::from_utf8_lossy(&output);
    for line in out_str.lines() {
        let (key, _segment) = line
            .split_once('\t')
            .unwrap_or_else(|| panic!("Zeile ohne Tab: {line}"));
        let state: wellrl_core::UserState = key
            .parse()
            .unwrap_or_else(|e| panic!("Schlüssel '{key}' nicht parsebar: {e}"));
        assert_eq!(state.to_string(), "5|0|6|4|7|10|4");
    }
}
