//! ε-greedy-Exploration mit multiplikativem Zerfall.

use rand::Rng;

use crate::params::Hyperparameters;

/// Hält ε im Intervall `[floor, initial]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
    initial: f64,
    decay: f64,
    floor: f64,
}

impl EpsilonGreedy {
    /// Erwartet bereits bereinigte Hyperparameter (siehe [`Hyperparameters::sanitized`]).
    #[must_use]
    pub fn new(hp: &Hyperparameters) -> Self {
        Self {
            epsilon: hp.initial_epsilon,
            initial: hp.initial_epsilon,
            decay: hp.epsilon_decay,
            floor: hp.min_epsilon,
        }
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Übernimmt ein gespeichertes ε, geklemmt auf `[floor, initial]`.
    pub fn restore(&mut self, epsilon: f64) {
        if epsilon.is_finite() {
            self.epsilon = epsilon.clamp(self.floor, self.initial);
        }
    }

    /// `ε ← max(floor, ε · decay)`; einmal pro Feedback-Zyklus.
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
    }

    /// Würfelt, ob dieser Schritt exploriert.
    pub fn explores<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.epsilon
    }
}
