//! Belohnung aus dem Zustand nach einer Empfehlung.
//!
//! `R = w_e · E + w_m · (M / 5) − w_d · D` mit Engagement `E`, Motivation `M`
//! und Abbruch-Indikator `D = 1`, falls `E < 0.1`.

use serde::{Deserialize, Serialize};
use wellrl_core::{Action, UserFeatures};

/// Engagement unterhalb dieser Schwelle gilt als Abbruch.
pub const DROPOUT_THRESHOLD: f64 = 0.1;

const MOTIVATION_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub engagement_weight: f64,
    pub motivation_weight: f64,
    pub dropout_penalty_weight: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            engagement_weight: 0.5,
            motivation_weight: 0.3,
            dropout_penalty_weight: 1.0,
        }
    }
}

impl RewardWeights {
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };
        Self {
            engagement_weight: finite_or(self.engagement_weight, defaults.engagement_weight),
            motivation_weight: finite_or(self.motivation_weight, defaults.motivation_weight),
            dropout_penalty_weight: finite_or(
                self.dropout_penalty_weight,
                defaults.dropout_penalty_weight,
            ),
        }
    }

    /// Skalare Belohnung für den Zustand nach der Aktion.
    ///
    /// `_action` wird durchgereicht, geht aber nicht in die Formel ein.
    #[must_use]
    pub fn reward(&self, after: &UserFeatures, _action: Action) -> f64 {
        let engagement = after.engagement_or_default();
        let motivation = after.motivation_or_default() / MOTIVATION_SCALE;
        let dropout = if engagement < DROPOUT_THRESHOLD { 1.0 } else { 0.0 };

        self.engagement_weight * engagement + self.motivation_weight * motivation
            - self.dropout_penalty_weight * dropout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(engagement: f64, motivation: f64) -> UserFeatures {
        UserFeatures {
            engagement: Some(engagement),
            motivation: Some(motivation),
            ..UserFeatures::default()
        }
    }

    #[test]
    fn weighted_sum_without_dropout() {
        let r = RewardWeights::default().reward(&after(0.8, 5.0), Action::Maintain);
        assert!((r - (0.5 * 0.8 + 0.3 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn low_engagement_is_penalized() {
        let r = RewardWeights::default().reward(&after(0.05, 2.0), Action::Maintain);
        assert!((r - (0.5 * 0.05 + 0.3 * 0.4 - 1.0)).abs() < 1e-12);
        // 0.1 liegt nicht mehr unter der Schwelle
        let r = RewardWeights::default().reward(&after(0.1, 2.0), Action::Maintain);
        assert!(r > 0.0);
    }

    #[test]
    fn action_does_not_change_reward() {
        let weights = RewardWeights::default();
        let state = after(0.4, 3.0);
        let first = weights.reward(&state, Action::ALL[0]);
        for action in Action::ALL {
            assert!((weights.reward(&state, action) - first).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn missing_values_use_defaults() {
        let r = RewardWeights::default().reward(&UserFeatures::default(), Action::Maintain);
        assert!((r - (0.5 * 0.5 + 0.3 * 0.6)).abs() < 1e-12);
    }
}
