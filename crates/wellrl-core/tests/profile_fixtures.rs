use std::fs;

use wellrl_core::profile::{FeedbackForm, UserProfile};
use wellrl_core::{encode, Action, ActivityCatalog, Segment};

fn read(path: &str) -> String {
    fs::read_to_string(format!("../../tests/fixtures/{path}"))
        .unwrap_or_else(|err| panic!("Failed to read fixture {path}: {err}"))
}

#[test]
fn typical_profile_encodes_to_known_key() {
    let profile: UserProfile =
        serde_json::from_str(&read("profile/typical.json")).expect("profile fixture");
    assert_eq!(profile.segment(), Segment::ModerateAnxietyModerateActivity);
    assert_eq!(profile.last_action(), Action::IncreaseMeditation);
    assert!(profile.last_recommendation_timestamp.is_some());
    assert_eq!(encode(&profile.features()).to_string(), "3|1|2|2|3|5|1");
}

#[test]
fn sparse_profile_infers_segment_and_uses_defaults() {
    let profile: UserProfile =
        serde_json::from_str(&read("profile/sparse.json")).expect("profile fixture");
    assert_eq!(profile.segment(), Segment::HighAnxietyLowActivity);
    assert_eq!(profile.last_action(), Action::Maintain);
    assert_eq!(encode(&profile.features()).to_string(), "3|0|2|3|1|5|0");
}

#[test]
fn feedback_form_fixture_updates_engagement_and_counters() {
    let profile: UserProfile =
        serde_json::from_str(&read("profile/typical.json")).expect("profile fixture");
    let form: FeedbackForm =
        serde_json::from_str(&read("feedback_form.json")).expect("form fixture");

    let outcome = profile.apply_feedback(&form);
    assert!((outcome.update.engagement_score - 0.75).abs() < 1e-12);
    assert!((outcome.update.motivation_score - 5.0).abs() < f64::EPSILON);
    assert_eq!(outcome.update.workouts_completed, 5);
    assert_eq!(outcome.update.meditation_sessions, 7);
    assert_eq!(encode(&outcome.after).to_string(), "3|1|2|2|3|7|1");
}

#[test]
fn catalog_fixture_is_indexed_by_segment_label() {
    let catalog: ActivityCatalog =
        serde_json::from_str(&read("catalog/default.json")).expect("catalog fixture");
    let moderate = catalog
        .for_segment(Segment::ModerateAnxietyModerateActivity)
        .expect("segment present");
    assert_eq!(moderate.physical.len(), 3);
    assert_eq!(moderate.mental.len(), 3);
    assert_eq!(moderate.iter().count(), 6);
    assert!(catalog.for_segment(Segment::PhysicalHealthRisk).is_none());
}
