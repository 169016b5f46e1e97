//! Kern-Typen und Traits für wellrl.
//!
//! Dieses Crate kennt weder Q-Tabellen noch Persistenz. Es definiert, wie
//! Rohmerkmale eines Nutzers in einen diskreten [`UserState`] überführt werden,
//! welche [`Action`]s eine Policy empfehlen kann und wie eine Entscheidung
//! ([`Decision`]) nach außen aussieht.

pub mod action;
pub mod activity;
pub mod features;
pub mod profile;
pub mod segment;
pub mod state;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use action::{action_name, Action, UnknownAction, ACTION_COUNT};
pub use activity::{ActivityCatalog, ActivityKind, ActivityTemplate, SegmentCatalog};
pub use features::UserFeatures;
pub use segment::Segment;
pub use state::{encode, StateKeyError, UserState};

/// Warum eine Aktion gewählt wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Why {
    /// Zufallsschritt mit Wahrscheinlichkeit ε.
    Explore,
    /// Bester bekannter Wert für diesen Zustand.
    Exploit,
    /// Zustand ohne gelernte Werte; gleichverteilte Wahl.
    ColdStart,
}

/// Ergebnis einer Policy-Abfrage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub state: UserState,
    pub action: Action,
    pub action_name: String,
    /// Aktueller Q-Wert der gewählten Aktion in `state`.
    pub value: f64,
    pub why: Why,
    /// ε zum Zeitpunkt der Entscheidung.
    pub epsilon: f64,
}

pub trait Policy {
    fn decide(&mut self, state: &UserState) -> Decision;
    fn feedback(&mut self, state: &UserState, action: Action, reward: f64, next_state: &UserState);
    fn decay(&mut self);
    fn snapshot(&self) -> Value;
    fn load(&mut self, snapshot: Value);
}
