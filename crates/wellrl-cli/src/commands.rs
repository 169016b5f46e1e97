//! Command handlers. Each takes parsed documents and returns a serializable
//! report; file and model I/O stays in `main`.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use wellrl_adapt::{
    adapt_program, adjust, classify, select_activities, should_include, ActivityCompletion,
    ActivityPlan, AdaptedProgram, AdjustedActivity, ProgramCatalog, SessionSummary,
};
use wellrl_core::profile::{FeedbackForm, FeedbackUpdate, RecommendationUpdate, UserProfile};
use wellrl_core::{
    encode, Action, ActivityCatalog, ActivityTemplate, Decision, Segment, UserState,
};
use wellrl_qlearn::{Agent, Hyperparameters, ModelStore, QLearnError, SharedAgent, TrainingStep};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile: UserProfile,
    /// Engagement contributions of recent sessions, oldest first.
    #[serde(default)]
    pub recent_engagement: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub segment: Segment,
    pub decision: Decision,
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<AdjustedActivity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<AdaptedProgram>,
    pub profile_update: RecommendationUpdate,
}

pub fn recommend<R: Rng + ?Sized>(
    agent: &Agent,
    request: &RecommendRequest,
    catalog: Option<&ActivityCatalog>,
    programs: Option<&ProgramCatalog>,
    rng: &mut R,
) -> Recommendation {
    let profile = &request.profile;
    let segment = profile.segment();
    let decision = agent.select_with(&encode(&profile.features()), rng);
    let action = decision.action;

    let activities: Option<Vec<AdjustedActivity>> = catalog.map(|catalog| match catalog.for_segment(segment) {
        Some(entries) => select_activities(action, entries, rng)
            .iter()
            .map(|template| adjust(template, profile.engagement_score, &request.recent_engagement))
            .collect(),
        None => {
            tracing::warn!(segment = segment.label(), "activity catalog has no entry for segment");
            Vec::new()
        }
    });

    let program = programs.and_then(|programs| match programs.for_segment(segment) {
        Some(baseline) => Some(adapt_program(baseline, action)),
        None => {
            tracing::warn!(segment = segment.label(), "program catalog has no entry for segment");
            None
        }
    });

    tracing::info!(
        state = %decision.state,
        action = action.name(),
        why = ?decision.why,
        "recommendation issued"
    );

    Recommendation {
        segment,
        reason: action.reason(),
        activities,
        program,
        profile_update: profile.record_recommendation(action, OffsetDateTime::now_utc()),
        decision,
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub profile: UserProfile,
    #[serde(flatten)]
    pub form: FeedbackForm,
}

#[derive(Debug, Serialize)]
pub struct FeedbackReport {
    pub action: Action,
    pub action_name: &'static str,
    pub reward: f64,
    pub state: UserState,
    pub next_state: UserState,
    pub training: TrainingStep,
    pub profile_update: FeedbackUpdate,
}

/// Credits the profile's last recommended action with the outcome of `form`.
pub fn feedback(shared: &SharedAgent, request: &FeedbackRequest) -> FeedbackReport {
    let outcome = request.profile.apply_feedback(&request.form);
    let action = request.profile.last_action();
    let state = encode(&outcome.before);
    let next_state = encode(&outcome.after);

    let reward = shared.reward(&outcome.after, action);
    let training = shared.train_step(&state, action, reward, &next_state);

    tracing::info!(
        %state,
        %next_state,
        action = action.name(),
        reward,
        q_value = training.q_value,
        "feedback applied"
    );

    FeedbackReport {
        action,
        action_name: action.name(),
        reward,
        state,
        next_state,
        training,
        profile_update: outcome.update,
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub activities: Vec<ActivityCompletion>,
    #[serde(default)]
    pub overall_rating: Option<u8>,
    /// Prior contributions per activity name, oldest first.
    #[serde(default)]
    pub engagement_by_activity: HashMap<String, Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct ActivityContribution {
    pub name: String,
    pub contribution: f64,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub contributions: Vec<ActivityContribution>,
    pub reward: f64,
    pub action: Action,
    pub action_name: &'static str,
    pub state: UserState,
    pub training: TrainingStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ActivityPlan>,
}

/// Uses the session contribution as reward for the last recommended action.
/// State and next state are the same profile snapshot.
pub fn session(
    shared: &SharedAgent,
    request: &SessionRequest,
    catalog: Option<&ActivityCatalog>,
) -> SessionReport {
    let summary = SessionSummary::from_activities(&request.activities, request.overall_rating);
    let reward = summary.engagement_contribution();
    let action = request.profile.last_action();
    let state = encode(&request.profile.features());
    let training = shared.train_step(&state, action, reward, &state);

    let contributions: Vec<ActivityContribution> = request
        .activities
        .iter()
        .map(|activity| ActivityContribution {
            name: activity.name.clone(),
            contribution: activity.engagement_contribution(),
        })
        .collect();

    let classification = catalog.and_then(|catalog| {
        let segment = request.profile.segment();
        let Some(entries) = catalog.for_segment(segment) else {
            tracing::warn!(segment = segment.label(), "activity catalog has no entry for segment");
            return None;
        };
        let mut history = request.engagement_by_activity.clone();
        for entry in &contributions {
            history
                .entry(entry.name.clone())
                .or_default()
                .push(entry.contribution);
        }
        Some(classify(entries.iter(), &history))
    });

    tracing::info!(
        %state,
        action = action.name(),
        reward,
        completion_rate = summary.completion_rate,
        "session recorded"
    );

    SessionReport {
        summary,
        contributions,
        reward,
        action,
        action_name: action.name(),
        state,
        training,
        classification,
    }
}

fn default_immediate() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub activity: ActivityTemplate,
    #[serde(default = "default_immediate")]
    pub immediate_engagement: f64,
    #[serde(default)]
    pub recent_engagement: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct AdjustReport {
    #[serde(flatten)]
    pub adjusted: AdjustedActivity,
    /// False when the history says the activity should be dropped.
    pub include: bool,
}

#[must_use]
pub fn adjust_activity(request: &AdjustRequest) -> AdjustReport {
    AdjustReport {
        adjusted: adjust(
            &request.activity,
            request.immediate_engagement,
            &request.recent_engagement,
        ),
        include: should_include(&request.recent_engagement),
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub activities: Vec<ActivityTemplate>,
    #[serde(default)]
    pub engagement: HashMap<String, Vec<f64>>,
}

#[must_use]
pub fn classify_activities(request: &ClassifyRequest) -> ActivityPlan {
    classify(&request.activities, &request.engagement)
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatsReport {
    Loaded {
        path: String,
        version: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        saved_at: Option<String>,
        states: usize,
        episodes: u64,
        total_reward: f64,
        average_reward: f64,
        epsilon: f64,
        hyperparameters: Hyperparameters,
    },
    Missing {
        path: String,
    },
    Invalid {
        path: String,
        error: String,
    },
}

#[must_use]
pub fn stats(store: &ModelStore) -> StatsReport {
    let path = store.path().display().to_string();
    let snapshot = match store.try_load() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return StatsReport::Missing { path },
        Err(err) => return invalid(path, &err),
    };
    let version = snapshot.version;
    let saved_at = snapshot.saved_at.clone();

    match Agent::from_snapshot(snapshot) {
        Ok(agent) => {
            let history = agent.history();
            #[allow(clippy::cast_precision_loss)]
            let average_reward = if history.episodes == 0 {
                0.0
            } else {
                history.total_reward / history.episodes as f64
            };
            StatsReport::Loaded {
                path,
                version,
                saved_at,
                states: agent.table().len(),
                episodes: history.episodes,
                total_reward: history.total_reward,
                average_reward,
                epsilon: agent.epsilon(),
                hyperparameters: *agent.hyperparameters(),
            }
        }
        Err(err) => invalid(path, &err),
    }
}

fn invalid(path: String, err: &QLearnError) -> StatsReport {
    tracing::warn!(%path, error = %err, "model snapshot is unusable");
    StatsReport::Invalid {
        path,
        error: err.to_string(),
    }
}
