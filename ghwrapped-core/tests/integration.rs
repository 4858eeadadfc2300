//! Integration tests for the ghwrapped profile engine
//!
//! These tests use fixture files in `tests/fixtures/` to verify the
//! end-to-end flow from raw events JSON to a finished profile.

use ghwrapped_core::analytics::{PeakTimeLabel, FALLBACK_PROFILE_VERSION, PROFILE_VERSION};
use ghwrapped_core::{
    generate_profile, generate_profile_with, profile_or_fallback, Label, Profile, ProfileOptions,
    RawEvents,
};
use serde_json::json;
use std::path::PathBuf;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> RawEvents {
    RawEvents::from_path(&fixture_path(name))
        .unwrap_or_else(|e| panic!("failed to load fixture {name}: {e}"))
}

fn assert_bounded(profile: &Profile) {
    let b = &profile.behaviors;
    for score in [
        b.focus_score,
        b.consistency_score,
        b.collaboration_score,
        b.burstiness_score,
    ] {
        assert!(score.is_finite(), "score not finite: {score}");
        assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
        assert_eq!(score, (score * 100.0).round() / 100.0, "more than 2 decimals: {score}");
    }

    let m = &profile.metrics;
    for ratio in [
        m.activity.weekend_ratio,
        m.focus.top_repo_ratio,
        m.collaboration.merged_ratio,
        m.collaboration.review_ratio,
    ] {
        assert!(ratio.is_finite() && (0.0..=1.0).contains(&ratio));
    }
    assert!(m.activity.peak_time.hour < 24);
    assert!(m.focus.top_languages.len() <= 3);
    assert!(!m.focus.main_language.is_empty());
}

// ============================================
// Scenario Tests
// ============================================

#[test]
fn test_zero_activity_profile() {
    let profile = generate_profile(&load_fixture("zero-activity.json"));

    assert_eq!(profile.profile_version, PROFILE_VERSION);
    assert!(profile.labels.is_empty());

    let activity = &profile.metrics.activity;
    assert_eq!(activity.active_days, 0);
    assert_eq!(activity.total_contributions, 0);
    assert_eq!(activity.peak_day.contribution_count, 0);
    assert_eq!(activity.weekend_ratio, 0.0);
    assert_eq!(activity.peak_time.hour, 0);
    assert_eq!(activity.peak_time.label, PeakTimeLabel::Night);
    assert_eq!(activity.peak_time.count, 0);

    assert_eq!(profile.metrics.focus.main_language, "Unknown");
    assert!(profile.metrics.focus.top_languages.is_empty());
    assert_eq!(profile.metrics.collaboration.total_prs, 0);
    assert_eq!(profile.metrics.collaboration.merged_ratio, 0.0);

    let b = &profile.behaviors;
    assert_eq!(b.focus_score, 0.0);
    assert_eq!(b.consistency_score, 0.0);
    assert_eq!(b.collaboration_score, 0.0);
    assert_eq!(b.burstiness_score, 0.0);
}

#[test]
fn test_full_year_metrics() {
    let profile = generate_profile(&load_fixture("full-year.json"));
    let activity = &profile.metrics.activity;

    assert_eq!(activity.active_days, 7);
    assert_eq!(activity.total_contributions, 40);
    assert_eq!(activity.created_project_count, 1);
    // 3 of 7 active days fall on a weekend
    assert!((activity.weekend_ratio - 3.0 / 7.0).abs() < 1e-12);

    // 14:xx UTC: two PRs, one review, one issue
    assert_eq!(activity.peak_time.hour, 14);
    assert_eq!(activity.peak_time.label, PeakTimeLabel::Afternoon);
    assert_eq!(activity.peak_time.count, 4);

    let focus = &profile.metrics.focus;
    assert_eq!(focus.repo_count, 3);
    assert_eq!(focus.top_repo_ratio, 0.75);

    let collab = &profile.metrics.collaboration;
    assert_eq!(collab.total_prs, 4);
    assert_eq!(collab.merged_ratio, 0.75);
    assert_eq!(collab.review_count, 2);
    assert_eq!(collab.issue_count, 1);
    assert_eq!(collab.review_ratio, 0.05);
}

#[test]
fn test_full_year_behaviors_and_labels() {
    let profile = generate_profile(&load_fixture("full-year.json"));
    let b = &profile.behaviors;

    assert_eq!(b.focus_score, 0.75);
    assert_eq!(b.consistency_score, 0.02);
    assert_eq!(b.collaboration_score, 0.12);
    assert_eq!(b.burstiness_score, 0.21);

    assert_eq!(profile.labels, vec![Label::HighFocus, Label::WeekendWarrior]);
}

#[test]
fn test_peak_day_tie_keeps_earlier_day() {
    let profile = generate_profile(&load_fixture("full-year.json"));
    let peak = &profile.metrics.activity.peak_day;
    assert_eq!(peak.date, "2025-03-14");
    assert_eq!(peak.contribution_count, 12);
}

#[test]
fn test_languages_exclude_markup_and_notebooks() {
    let profile = generate_profile(&load_fixture("full-year.json"));
    let focus = &profile.metrics.focus;

    let names: Vec<&str> = focus.top_languages.iter().map(|l| l.name.as_str()).collect();
    // Python and Go tie at 1200; Python was seen first
    assert_eq!(names, vec!["Rust", "Python", "Go"]);
    assert_eq!(focus.top_languages[0].size, 5800);
    assert_eq!(focus.main_language, "Rust");
}

#[test]
fn test_only_excluded_languages_is_unknown() {
    let profile = generate_profile(&load_fixture("sparse-nulls.json"));
    assert_eq!(profile.metrics.focus.main_language, "Unknown");
    assert!(profile.metrics.focus.top_languages.is_empty());
}

#[test]
fn test_utc_offset_shifts_peak_time() {
    let raw = load_fixture("full-year.json");
    let options = ProfileOptions::with_offset_minutes(8 * 60).unwrap();

    let profile = generate_profile_with(&raw, &options);

    assert_eq!(profile.metrics.activity.peak_time.hour, 22);
    assert_eq!(
        profile.metrics.activity.peak_time.label,
        PeakTimeLabel::Evening
    );
    // Scores do not depend on the offset
    assert_eq!(profile.behaviors, generate_profile(&raw).behaviors);
}

#[test]
fn test_sparse_nulls_degrade_to_defaults() {
    let profile = generate_profile(&load_fixture("sparse-nulls.json"));
    let activity = &profile.metrics.activity;

    assert_eq!(activity.total_contributions, 0);
    assert_eq!(activity.active_days, 1);
    assert_eq!(activity.weekend_ratio, 0.0);
    assert_eq!(activity.peak_time.count, 0);
    assert_eq!(profile.metrics.focus.repo_count, 0);
    assert_eq!(profile.metrics.collaboration.total_prs, 1);
    assert_eq!(profile.metrics.collaboration.issue_count, 1);
    assert_eq!(profile.behaviors.burstiness_score, 0.0);
    assert_eq!(profile.labels, vec![Label::WorkLifeBalanced]);
}

#[test]
fn test_mistyped_fields_are_skipped_not_fatal() {
    let profile = generate_profile(&load_fixture("mistyped-fields.json"));
    let activity = &profile.metrics.activity;

    assert_eq!(profile.profile_version, PROFILE_VERSION);
    assert_eq!(activity.total_contributions, 8);
    assert_eq!(activity.active_days, 2);
    assert_eq!(activity.weekend_ratio, 0.5);
    assert_eq!(activity.created_project_count, 1);
    // The numeric PR timestamp is dropped from the histogram only
    assert_eq!(activity.peak_time.hour, 16);
    assert_eq!(activity.peak_time.count, 2);

    let focus = &profile.metrics.focus;
    assert_eq!(focus.repo_count, 2);
    assert_eq!(focus.top_repo_ratio, 1.0);
    assert_eq!(focus.main_language, "Rust");
    assert_eq!(focus.top_languages[1].size, 0);

    let collab = &profile.metrics.collaboration;
    assert_eq!(collab.total_prs, 2);
    assert_eq!(collab.merged_ratio, 1.0);
    assert_eq!(collab.review_count, 1);
    assert_eq!(collab.issue_count, 0);
    assert_bounded(&profile);
}

#[test]
fn test_busy_year_collects_many_labels() {
    let mut days = Vec::new();
    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    for offset in 0..365 {
        let date = start + chrono::Days::new(offset);
        let count = if offset == 100 { 30 } else { 1 };
        days.push(json!({ "date": date.format("%Y-%m-%d").to_string(), "contributionCount": count }));
    }

    let by_repo: Vec<_> = (0..12)
        .map(|i| {
            json!({
                "repository": { "name": format!("repo-{i}"), "owner": { "login": "octocat" } },
                "contributions": { "totalCount": 10 }
            })
        })
        .collect();
    let prs: Vec<_> = (0..40)
        .map(|_| json!({ "createdAt": "2025-05-01T10:00:00Z", "merged": true }))
        .collect();
    let reviews: Vec<_> = (0..25)
        .map(|_| json!({ "submittedAt": "2025-05-02T11:00:00Z", "state": "APPROVED" }))
        .collect();

    let raw_json = json!({
        "calendar": { "totalContributions": 394, "weeks": [{ "contributionDays": days }] },
        "byRepo": by_repo,
        "collaboration": { "prs": prs, "reviews": reviews }
    });
    let raw = RawEvents::from_json(&raw_json.to_string()).unwrap();

    let profile = generate_profile(&raw);

    assert_eq!(profile.metrics.activity.active_days, 365);
    assert_eq!(profile.behaviors.consistency_score, 1.0);
    assert_eq!(profile.behaviors.collaboration_score, 1.0);
    assert_eq!(profile.behaviors.burstiness_score, 1.0);
    assert_eq!(profile.behaviors.focus_score, 0.08);
    assert_eq!(
        profile.labels,
        vec![
            Label::Explorer,
            Label::Collaborator,
            Label::CodeReviewer,
            Label::ShipIt,
            Label::Consistent,
            Label::Sprinter,
        ]
    );
    assert_bounded(&profile);
}

// ============================================
// Properties
// ============================================

#[test]
fn test_profiles_are_bounded() {
    for name in [
        "zero-activity.json",
        "full-year.json",
        "sparse-nulls.json",
        "mistyped-fields.json",
    ] {
        let profile = generate_profile(&load_fixture(name));
        assert_bounded(&profile);
    }
    assert_bounded(&generate_profile(&RawEvents::default()));
}

#[test]
fn test_generation_is_idempotent() {
    let raw = load_fixture("full-year.json");
    let options = ProfileOptions::default();

    let first = generate_profile_with(&raw, &options).to_json_pretty().unwrap();
    let second = generate_profile_with(&raw, &options).to_json_pretty().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_profile_json_round_trip() {
    for name in ["zero-activity.json", "full-year.json", "sparse-nulls.json"] {
        let profile = generate_profile(&load_fixture(name));
        let json = profile.to_json_pretty().unwrap();
        let parsed: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile, "round trip changed profile for {name}");
    }
}

#[test]
fn test_profile_json_shape() {
    let profile = generate_profile(&load_fixture("full-year.json"));
    let value = serde_json::to_value(&profile).unwrap();

    assert_eq!(value["profile_version"], "2025.behavior.v1");
    assert_eq!(value["labels"], json!(["High Focus", "Weekend Warrior"]));
    assert_eq!(value["behaviors"]["focus_score"], 0.75);
    assert_eq!(value["metrics"]["focus"]["main_language"], "Rust");
}

#[test]
fn test_raw_events_survive_save_and_reload() {
    let raw = load_fixture("full-year.json");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.json");

    std::fs::write(&path, serde_json::to_string_pretty(&raw).unwrap()).unwrap();
    let reloaded = RawEvents::from_path(&path).unwrap();

    assert_eq!(reloaded, raw);
    assert_eq!(generate_profile(&reloaded), generate_profile(&raw));
}

#[test]
fn test_invalid_input_is_an_error_not_a_panic() {
    assert!(RawEvents::from_path(&fixture_path("invalid.json")).is_err());
    assert!(RawEvents::from_path(&fixture_path("does-not-exist.json")).is_err());
}

#[test]
fn test_fallback_profile() {
    let fallback = Profile::fallback();
    assert_eq!(fallback.profile_version, FALLBACK_PROFILE_VERSION);
    assert!(fallback.is_fallback());
    assert!(fallback.labels.is_empty());
    assert_bounded(&fallback);

    let normal = profile_or_fallback(&load_fixture("full-year.json"), &ProfileOptions::default());
    assert!(!normal.is_fallback());
}
