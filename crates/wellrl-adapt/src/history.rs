//! Rolling engagement windows.

use serde::{Deserialize, Serialize};

/// Window used when adjusting a single activity.
pub const ADJUST_WINDOW: usize = 5;
/// Window used when deciding whether an activity stays in the plan.
pub const INCLUSION_WINDOW: usize = 10;

/// Bounded, chronological (oldest first) sequence of engagement scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementHistory {
    capacity: usize,
    scores: Vec<f64>,
}

impl EngagementHistory {
    /// An empty window; a capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            scores: Vec::with_capacity(capacity),
        }
    }

    /// Keeps the most recent `capacity` entries of `scores`.
    #[must_use]
    pub fn from_scores(capacity: usize, scores: &[f64]) -> Self {
        let mut history = Self::new(capacity);
        for score in scores {
            history.push(*score);
        }
        history
    }

    /// Appends a score and evicts the oldest one when full. Non-finite scores are dropped.
    pub fn push(&mut self, score: f64) {
        if !score.is_finite() {
            return;
        }
        if self.scores.len() == self.capacity {
            self.scores.remove(0);
        }
        self.scores.push(score);
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        mean_of_last(&self.scores, self.capacity)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }
}

/// Mean of the last `window` entries, `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_of_last(scores: &[f64], window: usize) -> Option<f64> {
    let tail = &scores[scores.len().saturating_sub(window)..];
    if tail.is_empty() {
        return None;
    }
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest() {
        let mut history = EngagementHistory::new(ADJUST_WINDOW);
        for score in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6] {
            history.push(score);
        }
        assert_eq!(history.as_slice(), &[0.2, 0.3, 0.4, 0.5, 0.6]);
        assert!((history.mean().unwrap_or_default() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn from_scores_keeps_most_recent() {
        let scores: Vec<f64> = (0..12).map(|i| f64::from(i) / 10.0).collect();
        let history = EngagementHistory::from_scores(INCLUSION_WINDOW, &scores);
        assert_eq!(history.len(), 10);
        assert!((history.as_slice()[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn mean_of_last_uses_tail_only() {
        assert_eq!(mean_of_last(&[], 5), None);
        let m = mean_of_last(&[1.0, 1.0, 0.0, 0.0], 2).unwrap_or_default();
        assert!(m.abs() < f64::EPSILON);
        let m = mean_of_last(&[0.4, 0.6], 5).unwrap_or_default();
        assert!((m - 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_finite_scores_are_ignored() {
        let mut history = EngagementHistory::new(0);
        history.push(f64::NAN);
        assert!(history.is_empty());
        history.push(0.3);
        history.push(0.7);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.as_slice(), &[0.7]);
    }
}
