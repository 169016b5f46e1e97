//! JSON documents in and out.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wellrl_qlearn::Hyperparameters;

/// Reads a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return serde_json::from_str(&buf).context("Failed to parse JSON from stdin");
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Hyperparameters for a fresh model; missing fields take their defaults.
pub fn load_hyperparameters(path: Option<&Path>) -> Result<Hyperparameters> {
    match path {
        Some(path) => read_json(path).context("Invalid hyperparameter file"),
        None => Ok(Hyperparameters::default()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
