//! Versioniertes Snapshot-Format.
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-01-04T12:00:00Z",
//!   "entries": [{"state": "3|1|2|2|3|5|4", "values": {"0": 0.1, "5": 0.0}}],
//!   "epsilon": 0.29,
//!   "history": {"episodes": 3, "total_reward": 1.2, "epsilon_current": 0.29},
//!   "hyperparameters": {"learning_rate": 0.1, "...": "..."}
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use wellrl_core::UserState;

use crate::params::{Hyperparameters, TrainingHistory};

pub const SNAPSHOT_VERSION: u32 = 1;

const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    pub entries: Vec<SnapshotEntry>,
    pub epsilon: f64,
    pub history: TrainingHistory,
    pub hyperparameters: Hyperparameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Kanonischer Schlüssel, strikt geparst.
    pub state: UserState,
    /// Aktions-Id → Q-Wert.
    pub values: BTreeMap<u8, f64>,
}

pub(crate) fn iso8601_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| FALLBACK_TIMESTAMP.to_string())
}
