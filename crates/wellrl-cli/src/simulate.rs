//! Synthetic users driving concurrent feedback against one shared agent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use wellrl_core::profile::{FeedbackForm, UserProfile};
use wellrl_core::{encode, Action, Segment};
use wellrl_qlearn::{SharedAgent, TrainingHistory};

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub users: usize,
    pub threads: usize,
    /// Feedback cycles per user.
    pub steps: usize,
    pub seed: u64,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub users: usize,
    pub threads: usize,
    pub steps: usize,
    pub seed: u64,
    pub decisions: u64,
    /// Share of decisions that hit the synthetic user's preferred action.
    pub preferred_rate: f64,
    pub average_reward: f64,
    pub states: usize,
    pub history: TrainingHistory,
}

/// The action a synthetic user of `segment` responds to best.
fn preferred_action(segment: Segment) -> Action {
    match segment {
        Segment::HighAnxietyLowActivity => Action::IncreaseMeditation,
        Segment::ModerateAnxietyModerateActivity => Action::IntroduceJournaling,
        Segment::LowAnxietyHighActivity => Action::IncreaseIntensity,
        Segment::PhysicalHealthRisk => Action::DecreaseIntensity,
        Segment::WellnessSeekers | Segment::InactiveUnengaged => Action::MotivationalMessage,
    }
}

fn synthetic_profile<R: Rng + ?Sized>(rng: &mut R) -> UserProfile {
    UserProfile {
        age: Some(rng.gen_range(18.0..70.0)),
        gender: Some(if rng.gen_bool(0.5) { "female" } else { "male" }.to_string()),
        height: Some(rng.gen_range(150.0..195.0)),
        weight: Some(rng.gen_range(50.0..110.0)),
        anxiety_score: Some(f64::from(rng.gen_range(0u8..=21))),
        activity_days: Some(f64::from(rng.gen_range(0u8..=7))),
        engagement_score: 0.5,
        motivation_score: 3.0,
        segment_label: None,
        last_recommended_action: None,
        last_recommendation_timestamp: None,
        workouts_completed: 0,
        meditation_sessions: 0,
    }
}

/// Synthetic outcome of recommending `action` to `profile`.
fn respond<R: Rng + ?Sized>(profile: &UserProfile, action: Action, rng: &mut R) -> FeedbackForm {
    let preferred = action == preferred_action(profile.segment());
    let drift = if preferred {
        0.08
    } else if action == Action::Maintain {
        0.0
    } else {
        -0.04
    };
    FeedbackForm {
        engagement_delta: drift + rng.gen_range(-0.03..0.03),
        workout_completed: matches!(
            action,
            Action::IncreaseIntensity | Action::DecreaseIntensity
        ) && preferred,
        meditation_completed: action == Action::IncreaseMeditation && preferred,
        feedback_rating: if preferred {
            rng.gen_range(4..=5)
        } else {
            rng.gen_range(2..=3)
        },
    }
}

pub fn run(shared: &SharedAgent, config: SimulationConfig) -> SimulationReport {
    let threads = config.threads.max(1);
    let decisions = AtomicU64::new(0);
    let preferred_hits = AtomicU64::new(0);
    let rewards = Mutex::new(0.0_f64);

    thread::scope(|scope| {
        for worker in 0..threads {
            let decisions = &decisions;
            let preferred_hits = &preferred_hits;
            let rewards = &rewards;
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(worker as u64));
                let mut users: Vec<UserProfile> = (worker..config.users)
                    .step_by(threads)
                    .map(|_| synthetic_profile(&mut rng))
                    .collect();
                let mut local_reward = 0.0;

                for _ in 0..config.steps {
                    for profile in &mut users {
                        let decision = shared.decide_with(&encode(&profile.features()), &mut rng);
                        let action = decision.action;
                        if action == preferred_action(profile.segment()) {
                            preferred_hits.fetch_add(1, Ordering::Relaxed);
                        }

                        let form = respond(profile, action, &mut rng);
                        let outcome = profile.apply_feedback(&form);
                        let reward = shared.reward(&outcome.after, action);
                        shared.train_step(
                            &encode(&outcome.before),
                            action,
                            reward,
                            &encode(&outcome.after),
                        );

                        profile.last_recommended_action = Some(i64::from(action.id()));
                        profile.engagement_score = outcome.update.engagement_score;
                        profile.motivation_score = outcome.update.motivation_score;
                        profile.workouts_completed = outcome.update.workouts_completed;
                        profile.meditation_sessions = outcome.update.meditation_sessions;

                        local_reward += reward;
                        decisions.fetch_add(1, Ordering::Relaxed);
                    }
                }

                let mut total = rewards
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *total += local_reward;
            });
        }
    });

    let decisions = decisions.into_inner();
    let preferred_hits = preferred_hits.into_inner();
    let reward_sum = rewards
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    #[allow(clippy::cast_precision_loss)]
    let (preferred_rate, average_reward) = if decisions == 0 {
        (0.0, 0.0)
    } else {
        (
            preferred_hits as f64 / decisions as f64,
            reward_sum / decisions as f64,
        )
    };

    let snapshot = shared.snapshot();
    tracing::info!(
        decisions,
        preferred_rate,
        states = snapshot.entries.len(),
        "simulation finished"
    );

    SimulationReport {
        users: config.users,
        threads,
        steps: config.steps,
        seed: config.seed,
        decisions,
        preferred_rate,
        average_reward,
        states: snapshot.entries.len(),
        history: snapshot.history,
    }
}
