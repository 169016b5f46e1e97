//! Q-Learning-Agent für Programm-Empfehlungen.
//!
//! Der `Agent` wählt mit Wahrscheinlichkeit ε eine zufällige Aktion und sonst
//! die beste bekannte Aktion des Zustands. Feedback wird über
//! `Q(s,a) ← Q(s,a) + η·(r + γ·max_a' Q(s',a') − Q(s,a))` eingearbeitet.

use std::collections::BTreeMap;

use rand::prelude::*;
use serde_json::{json, Value};
use wellrl_core::{Action, Decision, Policy, UserFeatures, UserState, Why};

use crate::error::{QLearnError, Result};
use crate::params::{Hyperparameters, TrainingHistory};
use crate::selector::EpsilonGreedy;
use crate::snapshot::{iso8601_now, Snapshot, SnapshotEntry, SNAPSHOT_VERSION};
use crate::table::QTable;

#[derive(Debug, Clone)]
pub struct Agent {
    hyperparameters: Hyperparameters,
    table: QTable,
    selector: EpsilonGreedy,
    history: TrainingHistory,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Hyperparameters::default())
    }
}

impl Agent {
    /// Frischer Agent mit leerer Tabelle.
    #[must_use]
    pub fn new(hyperparameters: Hyperparameters) -> Self {
        let hyperparameters = hyperparameters.sanitized();
        let selector = EpsilonGreedy::new(&hyperparameters);
        Self {
            hyperparameters,
            table: QTable::new(),
            selector,
            history: TrainingHistory::new(selector.epsilon()),
        }
    }

    #[must_use]
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    #[must_use]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    #[must_use]
    pub fn history(&self) -> TrainingHistory {
        self.history
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.selector.epsilon()
    }

    #[must_use]
    pub fn value(&self, state: &UserState, action: Action) -> f64 {
        self.table.value(state, action)
    }

    /// Greedy-Wahl ohne Exploration.
    #[must_use]
    pub fn best(&self, state: &UserState) -> Action {
        self.table.best(state, &mut thread_rng())
    }

    #[must_use]
    pub fn select(&self, state: &UserState) -> Action {
        self.select_with(state, &mut thread_rng()).action
    }

    /// ε-greedy-Auswahl mit explizitem Zufallsgenerator.
    pub fn select_with<R: Rng + ?Sized>(&self, state: &UserState, rng: &mut R) -> Decision {
        let (action, why) = if self.selector.explores(rng) {
            let action = Action::ALL
                .choose(rng)
                .copied()
                .unwrap_or(Action::Maintain);
            (action, Why::Explore)
        } else {
            let why = if self.table.is_cold(state) {
                Why::ColdStart
            } else {
                Why::Exploit
            };
            (self.table.best(state, rng), why)
        };

        Decision {
            state: *state,
            action,
            action_name: action.name().to_string(),
            value: self.table.value(state, action),
            why,
            epsilon: self.selector.epsilon(),
        }
    }

    /// Belohnung für den Zustand nach `action`.
    #[must_use]
    pub fn reward(&self, after: &UserFeatures, action: Action) -> f64 {
        self.hyperparameters.reward_weights.reward(after, action)
    }

    /// Q-Learning-Update; liefert den neuen Wert von `(state, action)`.
    ///
    /// Nicht-endliche Belohnungen werden verworfen und nicht gezählt.
    pub fn update(
        &mut self,
        state: &UserState,
        action: Action,
        reward: f64,
        next_state: &UserState,
    ) -> f64 {
        let current = self.table.value(state, action);
        if !reward.is_finite() {
            warn_event!("ignoring non-finite reward {} for state {}", reward, state);
            return current;
        }

        let next_best = self.table.max_value(next_state);
        let hp = &self.hyperparameters;
        let updated =
            current + hp.learning_rate * (reward + hp.discount_factor * next_best - current);

        self.table.set(*state, action, updated);
        self.history.episodes += 1;
        self.history.total_reward += reward;
        updated
    }

    /// ε-Zerfall; einmal pro abgeschlossenem Feedback-Zyklus.
    pub fn decay(&mut self) {
        self.selector.decay();
        self.history.epsilon_current = self.selector.epsilon();
    }

    /// Kopie von Tabelle, ε, Zählern und Hyperparametern.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut entries: Vec<SnapshotEntry> = self
            .table
            .iter()
            .map(|(state, row)| SnapshotEntry {
                state: *state,
                values: Action::ALL
                    .into_iter()
                    .map(|action| (action.id(), row[action.index()]))
                    .collect::<BTreeMap<_, _>>(),
            })
            .collect();
        entries.sort_by_key(|entry| entry.state);

        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Some(iso8601_now()),
            entries,
            epsilon: self.selector.epsilon(),
            history: self.history,
            hyperparameters: self.hyperparameters,
        }
    }

    /// Rekonstruiert einen Agenten. Das gespeicherte ε ist maßgeblich, wird aber
    /// auf `[min_epsilon, initial_epsilon]` geklemmt.
    ///
    /// # Errors
    ///
    /// Fehler bei falscher Version oder unbekannter Aktions-Id.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(QLearnError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut agent = Self::new(snapshot.hyperparameters);
        for entry in snapshot.entries {
            for (id, value) in entry.values {
                let action = Action::from_id(id).ok_or(QLearnError::InvalidAction(id))?;
                agent.table.set(entry.state, action, value);
            }
        }

        agent.selector.restore(snapshot.epsilon);
        agent.history = TrainingHistory {
            episodes: snapshot.history.episodes,
            total_reward: snapshot.history.total_reward,
            epsilon_current: agent.selector.epsilon(),
        };
        Ok(agent)
    }
}

impl Policy for Agent {
    fn decide(&mut self, state: &UserState) -> Decision {
        self.select_with(state, &mut thread_rng())
    }

    fn feedback(&mut self, state: &UserState, action: Action, reward: f64, next_state: &UserState) {
        self.update(state, action, reward, next_state);
    }

    fn decay(&mut self) {
        Agent::decay(self);
    }

    fn snapshot(&self) -> Value {
        serde_json::to_value(Agent::snapshot(self)).unwrap_or_else(|_| json!({}))
    }

    /// Ungültige Snapshots ersetzen den Agenten durch einen frischen mit den
    /// bisherigen Hyperparametern.
    fn load(&mut self, snapshot: Value) {
        let restored = serde_json::from_value::<Snapshot>(snapshot)
            .map_err(QLearnError::from)
            .and_then(Agent::from_snapshot);
        match restored {
            Ok(agent) => *self = agent,
            Err(err) => {
                warn_event!("discarding invalid snapshot, starting fresh: {}", err);
                *self = Agent::new(self.hyperparameters);
            }
        }
    }
}
