//! Thread-sicherer Zugriff auf einen [`Agent`].

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use serde::Serialize;
use wellrl_core::{Action, Decision, UserFeatures, UserState};

use crate::agent::Agent;
use crate::params::TrainingHistory;
use crate::snapshot::Snapshot;

/// Ergebnis eines kombinierten Update-und-Zerfall-Schritts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingStep {
    pub q_value: f64,
    pub history: TrainingHistory,
}

/// Lesende Zugriffe teilen sich die Sperre, Updates sind exklusiv.
///
/// Eine vergiftete Sperre wird übernommen.
#[derive(Debug, Default)]
pub struct SharedAgent {
    inner: RwLock<Agent>,
}

impl SharedAgent {
    #[must_use]
    pub fn new(agent: Agent) -> Self {
        Self {
            inner: RwLock::new(agent),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Agent> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Agent> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn decide(&self, state: &UserState) -> Decision {
        self.decide_with(state, &mut rand::thread_rng())
    }

    pub fn decide_with<R: Rng + ?Sized>(&self, state: &UserState, rng: &mut R) -> Decision {
        self.read().select_with(state, rng)
    }

    #[must_use]
    pub fn select(&self, state: &UserState) -> Action {
        self.decide(state).action
    }

    #[must_use]
    pub fn value(&self, state: &UserState, action: Action) -> f64 {
        self.read().value(state, action)
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.read().epsilon()
    }

    pub fn update(
        &self,
        state: &UserState,
        action: Action,
        reward: f64,
        next_state: &UserState,
    ) -> f64 {
        self.write().update(state, action, reward, next_state)
    }

    pub fn decay(&self) {
        self.write().decay();
    }

    /// Update und Zerfall unter derselben Schreibsperre.
    pub fn train_step(
        &self,
        state: &UserState,
        action: Action,
        reward: f64,
        next_state: &UserState,
    ) -> TrainingStep {
        let mut agent = self.write();
        let q_value = agent.update(state, action, reward, next_state);
        agent.decay();
        TrainingStep {
            q_value,
            history: agent.history(),
        }
    }

    #[must_use]
    pub fn reward(&self, after: &UserFeatures, action: Action) -> f64 {
        self.read().reward(after, action)
    }

    #[must_use]
    pub fn history(&self) -> TrainingHistory {
        self.read().history()
    }

    /// Kopie unter der Lesesperre; Serialisierung und I/O erfolgen außerhalb.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    #[must_use]
    pub fn into_inner(self) -> Agent {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Agent> for SharedAgent {
    fn from(agent: Agent) -> Self {
        Self::new(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use wellrl_core::encode;

    use crate::params::Hyperparameters;

    #[test]
    fn concurrent_updates_are_not_lost() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let shared = Arc::new(SharedAgent::default());
        let state = encode(&UserFeatures::default());

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        shared.update(&state, Action::Maintain, 1.0, &state);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        let mut sequential = Agent::default();
        for _ in 0..THREADS * PER_THREAD {
            sequential.update(&state, Action::Maintain, 1.0, &state);
        }

        let history = shared.history();
        assert_eq!(history.episodes, (THREADS * PER_THREAD) as u64);
        assert!((history.total_reward - (THREADS * PER_THREAD) as f64).abs() < 1e-9);
        assert!(
            (shared.value(&state, Action::Maintain) - sequential.value(&state, Action::Maintain))
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn train_step_decays_once_per_cycle() {
        let shared = SharedAgent::new(Agent::new(Hyperparameters::default()));
        let state = encode(&UserFeatures::default());
        let step = shared.train_step(&state, Action::IncreaseMeditation, 0.5, &state);
        assert!((step.q_value - 0.05).abs() < 1e-12);
        assert_eq!(step.history.episodes, 1);
        assert!((step.history.epsilon_current - 0.3 * 0.995).abs() < 1e-15);
        assert!((shared.epsilon() - step.history.epsilon_current).abs() < f64::EPSILON);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let shared = Arc::new(SharedAgent::default());
        let state = encode(&UserFeatures::default());
        shared.update(&state, Action::Maintain, 1.0, &state);

        let poison = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _guard = poison.write();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(shared.history().episodes, 1);
        shared.update(&state, Action::Maintain, 1.0, &state);
        assert_eq!(shared.history().episodes, 2);
    }
}
