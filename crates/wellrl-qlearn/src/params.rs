//! Hyperparameter und Trainingszähler.

use serde::{Deserialize, Serialize};

use crate::reward::RewardWeights;

/// Unveränderliche Lernparameter eines Agenten.
///
/// Fehlende Felder beim Deserialisieren erhalten die Defaults, damit auch
/// unvollständige Konfigurationsdateien funktionieren.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// η in der Update-Regel.
    pub learning_rate: f64,
    /// γ in der Update-Regel.
    pub discount_factor: f64,
    /// Start- und Höchstwert für ε.
    pub initial_epsilon: f64,
    /// Multiplikator pro abgeschlossenem Feedback-Zyklus.
    pub epsilon_decay: f64,
    /// Untergrenze für ε.
    pub min_epsilon: f64,
    pub reward_weights: RewardWeights,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            initial_epsilon: 0.3,
            epsilon_decay: 0.995,
            min_epsilon: 0.05,
            reward_weights: RewardWeights::default(),
        }
    }
}

fn unit_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl Hyperparameters {
    /// Klemmt alle Raten auf [0, 1] und stellt `min_epsilon <= initial_epsilon` sicher.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let initial_epsilon = unit_or(self.initial_epsilon, defaults.initial_epsilon);
        let min_epsilon = unit_or(self.min_epsilon, defaults.min_epsilon).min(initial_epsilon);
        Self {
            learning_rate: unit_or(self.learning_rate, defaults.learning_rate),
            discount_factor: unit_or(self.discount_factor, defaults.discount_factor),
            initial_epsilon,
            epsilon_decay: unit_or(self.epsilon_decay, defaults.epsilon_decay),
            min_epsilon,
            reward_weights: self.reward_weights.sanitized(),
        }
    }
}

/// Zähler über alle Updates seit Erzeugung des Agenten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub episodes: u64,
    pub total_reward: f64,
    /// Spiegel von ε nach dem letzten Zerfall.
    pub epsilon_current: f64,
}

impl TrainingHistory {
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            episodes: 0,
            total_reward: 0.0,
            epsilon_current: epsilon,
        }
    }
}
