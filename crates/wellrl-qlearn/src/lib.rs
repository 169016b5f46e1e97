#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Tabellarisches Q-Learning für Programm-Empfehlungen.
//!
//! Der [`Agent`] bündelt Q-Tabelle, ε-greedy-Auswahl, Belohnungsfunktion und
//! Trainingszähler. Er ist ein gewöhnlicher, exklusiv besessener Wert; für
//! nebenläufige Request-Handler wird er in einen [`SharedAgent`] gelegt.
//! [`ModelStore`] schreibt und liest den Zustand als versionierten JSON-Snapshot.

// Warnungen gehen mit `telemetry` an `tracing`, sonst an stderr.
macro_rules! warn_event {
    ($($arg:tt)+) => {{
        #[cfg(feature = "telemetry")]
        {
            tracing::warn!($($arg)+);
        }
        #[cfg(not(feature = "telemetry"))]
        {
            eprintln!($($arg)+);
        }
    }};
}

macro_rules! info_event {
    ($($arg:tt)+) => {{
        #[cfg(feature = "telemetry")]
        {
            tracing::info!($($arg)+);
        }
    }};
}

pub mod agent;
pub mod error;
pub mod params;
pub mod reward;
pub mod selector;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod table;

pub use agent::Agent;
pub use error::{QLearnError, Result};
pub use params::{Hyperparameters, TrainingHistory};
pub use reward::RewardWeights;
pub use selector::EpsilonGreedy;
pub use shared::{SharedAgent, TrainingStep};
pub use snapshot::{Snapshot, SnapshotEntry, SNAPSHOT_VERSION};
pub use store::{ModelLock, ModelStore};
pub use table::QTable;
