//! Metrics computation
//!
//! Folds a [`RawEvents`] snapshot into three groups of plain numbers:
//! activity rhythm, project/language focus, and collaboration volume.
//! Every ratio is guarded against a zero denominator, so an empty snapshot
//! yields an all-zero [`Metrics`].

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::{ContributionDay, RawEvents};

use super::ProfileOptions;

/// Languages that describe markup or glue rather than engineering focus.
pub const EXCLUDED_LANGUAGES: [&str; 4] = ["Jupyter Notebook", "HTML", "CSS", "Shell"];

/// How many languages `top_languages` keeps.
pub const TOP_LANGUAGE_COUNT: usize = 3;

/// `main_language` when no language survives the stoplist.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// First hour (inclusive) of each peak-time band. Hours before
/// [`MORNING_START_HOUR`] are `Night`.
pub const MORNING_START_HOUR: u32 = 6;
pub const AFTERNOON_START_HOUR: u32 = 12;
pub const EVENING_START_HOUR: u32 = 18;

/// All derived metrics for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub activity: ActivityMetrics,
    pub focus: FocusMetrics,
    pub collaboration: CollaborationMetrics,
}

/// Activity rhythm over the contribution calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Days with at least one contribution
    pub active_days: u64,
    /// Calendar total as reported by GitHub
    pub total_contributions: u64,
    /// Busiest day; zero count and empty date when there were no active days
    pub peak_day: ContributionDay,
    /// Share of active days falling on Saturday or Sunday
    pub weekend_ratio: f64,
    /// Repositories created in the window that received commits
    pub created_project_count: u64,
    pub peak_time: PeakTime,
}

/// Busiest local hour across PRs, reviews, issues and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakTime {
    /// Hour of day, 0-23
    pub hour: u32,
    pub label: PeakTimeLabel,
    /// Events in that hour
    pub count: u64,
}

/// Part of the day a peak hour falls in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakTimeLabel {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Night,
}

impl PeakTimeLabel {
    /// Classify an hour of day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        if (MORNING_START_HOUR..AFTERNOON_START_HOUR).contains(&hour) {
            PeakTimeLabel::Morning
        } else if (AFTERNOON_START_HOUR..EVENING_START_HOUR).contains(&hour) {
            PeakTimeLabel::Afternoon
        } else if (EVENING_START_HOUR..24).contains(&hour) {
            PeakTimeLabel::Evening
        } else {
            PeakTimeLabel::Night
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeakTimeLabel::Morning => "Morning",
            PeakTimeLabel::Afternoon => "Afternoon",
            PeakTimeLabel::Evening => "Evening",
            PeakTimeLabel::Night => "Night",
        }
    }
}

/// Project and language concentration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusMetrics {
    /// Repositories with commit contributions
    pub repo_count: u64,
    /// Top repository's share of all repository commits
    pub top_repo_ratio: f64,
    pub main_language: String,
    /// Up to [`TOP_LANGUAGE_COUNT`] languages by summed size, largest first
    pub top_languages: Vec<LanguageShare>,
}

impl Default for FocusMetrics {
    fn default() -> Self {
        Self {
            repo_count: 0,
            top_repo_ratio: 0.0,
            main_language: UNKNOWN_LANGUAGE.to_string(),
            top_languages: Vec::new(),
        }
    }
}

/// A language and its summed size in bytes across repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub size: u64,
}

/// Pull request, review and issue volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationMetrics {
    pub total_prs: u64,
    /// Merged PRs / total PRs
    pub merged_ratio: f64,
    pub review_count: u64,
    pub issue_count: u64,
    /// Reviews / total contributions, capped at 1.0
    pub review_ratio: f64,
}

/// Compute all metric groups from a snapshot.
pub fn compute_metrics(raw: &RawEvents, options: &ProfileOptions) -> Metrics {
    let activity = activity_metrics(raw, options.utc_offset);
    let collaboration = collaboration_metrics(raw, activity.total_contributions);
    Metrics {
        activity,
        focus: focus_metrics(raw),
        collaboration,
    }
}

fn activity_metrics(raw: &RawEvents, offset: FixedOffset) -> ActivityMetrics {
    let active: Vec<&ContributionDay> = raw
        .calendar
        .days()
        .filter(|day| day.contribution_count > 0)
        .collect();
    let active_days = active.len() as u64;

    // First strictly-greater count wins, so ties keep the earlier day.
    let peak_day = active
        .iter()
        .copied()
        .fold(None::<&ContributionDay>, |best, day| match best {
            Some(b) if day.contribution_count <= b.contribution_count => Some(b),
            _ => Some(day),
        })
        .cloned()
        .unwrap_or_default();

    let weekend_days = active.iter().filter(|day| is_weekend(&day.date)).count() as u64;

    ActivityMetrics {
        active_days,
        total_contributions: raw.calendar.total_contributions,
        peak_day,
        weekend_ratio: ratio(weekend_days, active_days),
        created_project_count: raw.created_repos.len() as u64,
        peak_time: peak_time(&hourly_histogram(raw, offset)),
    }
}

/// `YYYY-MM-DD` on a Saturday or Sunday. Unparseable dates are weekdays.
fn is_weekend(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(false)
}

/// Local hour of an RFC 3339 timestamp, or `None` if it does not parse.
fn local_hour(timestamp: &str, offset: FixedOffset) -> Option<usize> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|ts| ts.with_timezone(&offset).hour() as usize)
}

fn hourly_histogram(raw: &RawEvents, offset: FixedOffset) -> [u64; 24] {
    let mut hours = [0u64; 24];
    for hour in raw
        .collaboration
        .timestamps()
        .filter_map(|ts| local_hour(ts, offset))
    {
        hours[hour] += 1;
    }
    hours
}

fn peak_time(hours: &[u64; 24]) -> PeakTime {
    let mut peak_hour = 0usize;
    let mut peak_count = 0u64;
    for (hour, &count) in hours.iter().enumerate() {
        if count > peak_count {
            peak_count = count;
            peak_hour = hour;
        }
    }
    let hour = peak_hour as u32;
    PeakTime {
        hour,
        label: PeakTimeLabel::from_hour(hour),
        count: peak_count,
    }
}

fn focus_metrics(raw: &RawEvents) -> FocusMetrics {
    // Summed wide so counts near u64::MAX cannot overflow.
    let repo_total: u128 = raw
        .by_repo
        .iter()
        .map(|r| u128::from(r.contributions.total_count))
        .sum();
    let top_repo_ratio = match raw.by_repo.first() {
        Some(top) if repo_total > 0 => top.contributions.total_count as f64 / repo_total as f64,
        _ => 0.0,
    };

    let top_languages = top_languages(raw);
    let main_language = top_languages
        .first()
        .map(|lang| lang.name.clone())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    FocusMetrics {
        repo_count: raw.by_repo.len() as u64,
        top_repo_ratio,
        main_language,
        top_languages,
    }
}

/// Sum sizes per language, drop the stoplist, keep the largest few.
/// Equal sizes keep the order in which languages were first seen.
fn top_languages(raw: &RawEvents) -> Vec<LanguageShare> {
    let mut totals: Vec<LanguageShare> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    let edges = raw.languages.iter().flat_map(|repo| repo.languages.edges.iter());
    for edge in edges {
        let name = edge.node.name.as_str();
        if name.is_empty() || EXCLUDED_LANGUAGES.contains(&name) {
            continue;
        }
        match index.get(name) {
            Some(&i) => totals[i].size = totals[i].size.saturating_add(edge.size),
            None => {
                index.insert(name, totals.len());
                totals.push(LanguageShare {
                    name: name.to_string(),
                    size: edge.size,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.size.cmp(&a.size));
    totals.truncate(TOP_LANGUAGE_COUNT);
    totals
}

fn collaboration_metrics(raw: &RawEvents, total_contributions: u64) -> CollaborationMetrics {
    let collab = &raw.collaboration;
    let total_prs = collab.prs.len() as u64;
    let merged = collab.prs.iter().filter(|pr| pr.merged).count() as u64;
    let review_count = collab.reviews.len() as u64;

    CollaborationMetrics {
        total_prs,
        merged_ratio: ratio(merged, total_prs),
        review_count,
        issue_count: collab.issues.len() as u64,
        review_ratio: ratio(review_count, total_contributions).min(1.0),
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
