//! Profile assembly
//!
//! Runs metrics, behaviors and labels over one snapshot and stamps the
//! result with [`PROFILE_VERSION`].

use std::panic::{self, AssertUnwindSafe};

use chrono::{FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RawEvents;

use super::{compute_metrics, map_labels, score_behaviors, Behaviors, Label, Metrics};

/// Version tag carried by every computed profile.
pub const PROFILE_VERSION: &str = "2025.behavior.v1";

/// Version tag of [`Profile::fallback`].
pub const FALLBACK_PROFILE_VERSION: &str = "error";

/// Options for profile computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Offset used to turn event timestamps into local hours of day
    pub utc_offset: FixedOffset,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl ProfileOptions {
    /// Options for a fixed offset in minutes east of UTC.
    ///
    /// Returns `None` for offsets outside ±24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|utc_offset| Self { utc_offset })
    }

    /// Options using the host's current UTC offset.
    pub fn local() -> Self {
        Self {
            utc_offset: Local::now().offset().fix(),
        }
    }
}

/// The finished behavior profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_version: String,
    pub metrics: Metrics,
    pub behaviors: Behaviors,
    pub labels: Vec<Label>,
}

impl Profile {
    /// Zeroed profile used when computation could not run.
    pub fn fallback() -> Self {
        Self {
            profile_version: FALLBACK_PROFILE_VERSION.to_string(),
            metrics: Metrics::default(),
            behaviors: Behaviors::default(),
            labels: Vec::new(),
        }
    }

    /// Whether this is the zeroed fallback rather than a computed profile.
    pub fn is_fallback(&self) -> bool {
        self.profile_version == FALLBACK_PROFILE_VERSION
    }

    /// Pretty JSON, as embedded in narrative prompts.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compute a profile with UTC hour bucketing.
pub fn generate_profile(raw: &RawEvents) -> Profile {
    generate_profile_with(raw, &ProfileOptions::default())
}

/// Compute a profile. Never fails; an empty snapshot gives a zeroed
/// profile with no labels.
pub fn generate_profile_with(raw: &RawEvents, options: &ProfileOptions) -> Profile {
    let metrics = compute_metrics(raw, options);
    let behaviors = score_behaviors(&metrics);
    let labels = map_labels(&behaviors, &metrics);

    tracing::debug!(
        active_days = metrics.activity.active_days,
        repo_count = metrics.focus.repo_count,
        labels = labels.len(),
        "Profile computed"
    );

    Profile {
        profile_version: PROFILE_VERSION.to_string(),
        metrics,
        behaviors,
        labels,
    }
}

/// Compute a profile, substituting [`Profile::fallback`] if computation
/// panics.
pub fn profile_or_fallback(raw: &RawEvents, options: &ProfileOptions) -> Profile {
    match panic::catch_unwind(AssertUnwindSafe(|| generate_profile_with(raw, options))) {
        Ok(profile) => profile,
        Err(_) => {
            tracing::error!("Profile computation failed, using fallback profile");
            Profile::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContributionCalendar, ContributionDay, ContributionWeek};

    #[test]
    fn test_empty_snapshot_profile() {
        let profile = generate_profile(&RawEvents::default());
        assert_eq!(profile.profile_version, PROFILE_VERSION);
        assert_eq!(profile.metrics, Metrics::default());
        assert_eq!(profile.behaviors, Behaviors::default());
        assert!(profile.labels.is_empty());
        assert!(!profile.is_fallback());
    }

    #[test]
    fn test_fallback_profile() {
        let profile = Profile::fallback();
        assert!(profile.is_fallback());
        assert_eq!(profile.metrics.focus.main_language, "Unknown");
        assert!(profile.labels.is_empty());
    }

    #[test]
    fn test_profile_or_fallback_passes_through() {
        let raw = RawEvents {
            calendar: ContributionCalendar {
                total_contributions: 3,
                weeks: vec![ContributionWeek {
                    contribution_days: vec![ContributionDay {
                        contribution_count: 3,
                        date: "2025-03-03".to_string(),
                    }],
                }],
            },
            ..Default::default()
        };
        let options = ProfileOptions::default();
        assert_eq!(
            profile_or_fallback(&raw, &options),
            generate_profile_with(&raw, &options)
        );
    }

    #[test]
    fn test_offset_bounds() {
        assert!(ProfileOptions::with_offset_minutes(-300).is_some());
        assert!(ProfileOptions::with_offset_minutes(24 * 60).is_none());
        assert_eq!(
            ProfileOptions::with_offset_minutes(0),
            Some(ProfileOptions::default())
        );
    }

    #[test]
    fn test_profile_json_shape() {
        let json = serde_json::to_value(generate_profile(&RawEvents::default())).unwrap();
        assert_eq!(json["profile_version"], "2025.behavior.v1");
        assert_eq!(json["metrics"]["activity"]["peak_day"]["contributionCount"], 0);
        assert_eq!(json["metrics"]["activity"]["peak_day"]["date"], "");
        assert_eq!(json["metrics"]["activity"]["peak_time"]["label"], "Night");
        assert_eq!(json["metrics"]["focus"]["main_language"], "Unknown");
        assert_eq!(json["behaviors"]["burstiness_score"], 0.0);
        assert_eq!(json["labels"], serde_json::json!([]));
    }
}
