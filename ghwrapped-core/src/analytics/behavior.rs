//! Behavior scoring
//!
//! Maps [`Metrics`] onto four scores in `[0, 1]`, each rounded to two
//! decimals (half away from zero).

use serde::{Deserialize, Serialize};

use super::Metrics;

/// Days in the window; `active_days` at this value is fully consistent.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// PRs + reviews at which collaboration saturates at 1.0. Tunable.
pub const COLLABORATION_SATURATION: f64 = 50.0;

/// Peak day / average day multiple at which burstiness saturates. Tunable.
pub const BURST_SATURATION: f64 = 10.0;

/// Normalized behavior scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Behaviors {
    /// Concentration on the top repository
    pub focus_score: f64,
    /// Share of the year with activity
    pub consistency_score: f64,
    /// PR and review volume relative to [`COLLABORATION_SATURATION`]
    pub collaboration_score: f64,
    /// Peak day relative to the average active day
    pub burstiness_score: f64,
}

/// Score the behaviors implied by a set of metrics.
pub fn score_behaviors(metrics: &Metrics) -> Behaviors {
    let activity = &metrics.activity;
    let collab = &metrics.collaboration;

    let consistency = activity.active_days as f64 / DAYS_PER_YEAR;
    let collaboration =
        collab.review_count.saturating_add(collab.total_prs) as f64 / COLLABORATION_SATURATION;

    let avg_contrib = if activity.active_days > 0 {
        activity.total_contributions as f64 / activity.active_days as f64
    } else {
        0.0
    };
    let burstiness = if avg_contrib > 0.0 {
        (activity.peak_day.contribution_count as f64 / avg_contrib) / BURST_SATURATION
    } else {
        0.0
    };

    Behaviors {
        focus_score: normalize(metrics.focus.top_repo_ratio),
        consistency_score: normalize(consistency),
        collaboration_score: normalize(collaboration),
        burstiness_score: normalize(burstiness),
    }
}

/// Clamp to `[0, 1]` and round to two decimals. Non-finite input scores 0.
fn normalize(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::{ActivityMetrics, CollaborationMetrics, FocusMetrics};
    use crate::types::ContributionDay;

    fn metrics(active_days: u64, total: u64, peak: u64, prs: u64, reviews: u64) -> Metrics {
        Metrics {
            activity: ActivityMetrics {
                active_days,
                total_contributions: total,
                peak_day: ContributionDay {
                    contribution_count: peak,
                    date: "2025-06-01".to_string(),
                },
                ..Default::default()
            },
            focus: FocusMetrics::default(),
            collaboration: CollaborationMetrics {
                total_prs: prs,
                review_count: reviews,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_zero_metrics_score_zero() {
        assert_eq!(score_behaviors(&Metrics::default()), Behaviors::default());
    }

    #[test]
    fn test_consistency_rounds_and_saturates() {
        // 200 / 365 = 0.5479...
        let b = score_behaviors(&metrics(200, 400, 2, 0, 0));
        assert_eq!(b.consistency_score, 0.55);

        let b = score_behaviors(&metrics(366, 400, 2, 0, 0));
        assert_eq!(b.consistency_score, 1.0);
    }

    #[test]
    fn test_collaboration_score() {
        let b = score_behaviors(&metrics(0, 0, 0, 12, 8));
        assert_eq!(b.collaboration_score, 0.4);

        let b = score_behaviors(&metrics(0, 0, 0, 70, 30));
        assert_eq!(b.collaboration_score, 1.0);
    }

    #[test]
    fn test_burstiness() {
        // avg = 100 / 50 = 2; peak 6 -> 3x -> 0.3
        let b = score_behaviors(&metrics(50, 100, 6, 0, 0));
        assert_eq!(b.burstiness_score, 0.3);

        // avg = 1; peak 40 -> 40x -> capped
        let b = score_behaviors(&metrics(10, 10, 40, 0, 0));
        assert_eq!(b.burstiness_score, 1.0);
    }

    #[test]
    fn test_burstiness_zero_without_contributions() {
        // Active days but a zero reported total.
        let b = score_behaviors(&metrics(5, 0, 3, 0, 0));
        assert_eq!(b.burstiness_score, 0.0);
    }

    #[test]
    fn test_focus_passes_through_rounded() {
        let mut m = Metrics::default();
        m.focus.top_repo_ratio = 2.0 / 3.0;
        assert_eq!(score_behaviors(&m).focus_score, 0.67);
    }

    #[test]
    fn test_normalize_guards() {
        assert_eq!(normalize(f64::NAN), 0.0);
        assert_eq!(normalize(f64::INFINITY), 0.0);
        assert_eq!(normalize(-0.4), 0.0);
        assert_eq!(normalize(1.7), 1.0);
    }
}
