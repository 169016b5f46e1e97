//! Dünn besetzte Q-Tabelle: Zustand → Wertezeile über alle Aktionen.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use wellrl_core::{Action, UserState, ACTION_COUNT};

type Row = [f64; ACTION_COUNT];

const EMPTY_ROW: Row = [0.0; ACTION_COUNT];

/// Zeilen werden beim ersten Update eines Zustands angelegt und nie entfernt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<UserState, Row>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Q-Wert, 0.0 für unbekannte Paare.
    #[must_use]
    pub fn value(&self, state: &UserState, action: Action) -> f64 {
        self.rows
            .get(state)
            .map_or(0.0, |row| row[action.index()])
    }

    /// Alle Werte eines Zustands in Aktionsreihenfolge.
    #[must_use]
    pub fn values(&self, state: &UserState) -> Row {
        self.rows.get(state).copied().unwrap_or(EMPTY_ROW)
    }

    #[must_use]
    pub fn max_value(&self, state: &UserState) -> f64 {
        self.values(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// True, wenn alle Werte des Zustands exakt 0.0 sind.
    #[must_use]
    pub fn is_cold(&self, state: &UserState) -> bool {
        self.values(state).iter().all(|v| *v == 0.0)
    }

    /// Aktionen mit dem höchsten Wert. Bei einem kalten Zustand sind das alle.
    #[must_use]
    pub fn best_candidates(&self, state: &UserState) -> Vec<Action> {
        let row = self.values(state);
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Action::ALL
            .into_iter()
            .filter(|action| row[action.index()] == max)
            .collect()
    }

    /// Argmax mit gleichverteilter Wahl unter allen Maxima.
    ///
    /// Ein kalter Zustand ergibt eine Gleichverteilung über alle sechs Aktionen.
    pub fn best<R: Rng + ?Sized>(&self, state: &UserState, rng: &mut R) -> Action {
        self.best_candidates(state)
            .choose(rng)
            .copied()
            .unwrap_or(Action::Maintain)
    }

    pub(crate) fn set(&mut self, state: UserState, action: Action, value: f64) {
        self.rows.entry(state).or_insert(EMPTY_ROW)[action.index()] = value;
    }

    /// Anzahl der besuchten Zustände.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vollständiger Dump, nur für die Persistenz.
    pub fn iter(&self) -> impl Iterator<Item = (&UserState, &Row)> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wellrl_core::{encode, UserFeatures};

    fn state() -> UserState {
        encode(&UserFeatures::default())
    }

    #[test]
    fn unknown_pairs_read_as_zero() {
        let table = QTable::new();
        assert!(table.value(&state(), Action::Maintain).abs() < f64::EPSILON);
        assert!(table.is_cold(&state()));
        assert!(table.is_empty());
    }

    #[test]
    fn unique_maximum_is_chosen_deterministically() {
        let mut table = QTable::new();
        table.set(state(), Action::IntroduceJournaling, 0.4);
        table.set(state(), Action::IncreaseIntensity, 0.1);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(table.best(&state(), &mut rng), Action::IntroduceJournaling);
        }
    }

    #[test]
    fn cold_state_spreads_over_all_actions() {
        let table = QTable::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [0usize; ACTION_COUNT];
        for _ in 0..600 {
            seen[table.best(&state(), &mut rng).index()] += 1;
        }
        assert!(seen.iter().all(|count| *count > 0), "{seen:?}");
    }

    #[test]
    fn ties_between_learned_values_are_randomized() {
        let mut table = QTable::new();
        table.set(state(), Action::DecreaseIntensity, 0.7);
        table.set(state(), Action::MotivationalMessage, 0.7);
        table.set(state(), Action::Maintain, 0.2);
        assert_eq!(
            table.best_candidates(&state()),
            vec![Action::DecreaseIntensity, Action::MotivationalMessage]
        );

        let mut rng = StdRng::seed_from_u64(5);
        let mut decrease = 0;
        let mut motivate = 0;
        for _ in 0..200 {
            match table.best(&state(), &mut rng) {
                Action::DecreaseIntensity => decrease += 1,
                Action::MotivationalMessage => motivate += 1,
                other => panic!("picked non-maximal action {other:?}"),
            }
        }
        assert!(decrease > 0 && motivate > 0);
    }

    #[test]
    fn zero_beats_negative_values() {
        let mut table = QTable::new();
        for action in Action::ALL {
            table.set(state(), action, -0.5);
        }
        table.set(state(), Action::IncreaseMeditation, 0.0);
        assert!(!table.is_cold(&state()));
        assert_eq!(table.best_candidates(&state()), vec![Action::IncreaseMeditation]);
        assert!(table.max_value(&state()).abs() < f64::EPSILON);
    }
}
