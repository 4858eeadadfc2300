//! Profile engine for ghwrapped
//!
//! Turns one year of raw GitHub activity into a compact behavior profile:
//! - [`metrics`]: activity, focus and collaboration numbers
//! - [`behavior`]: four normalized scores in `[0, 1]`
//! - [`labels`]: descriptive tags from threshold rules
//! - [`profile`]: assembly and versioning
//!
//! Everything here is pure and deterministic. Given the same
//! [`RawEvents`](crate::types::RawEvents) and [`ProfileOptions`] the output is
//! identical; nothing reads the clock, the network or the filesystem.

pub mod behavior;
pub mod labels;
pub mod metrics;
pub mod profile;

pub use behavior::{score_behaviors, Behaviors};
pub use labels::{map_labels, Label};
pub use metrics::{
    compute_metrics, ActivityMetrics, CollaborationMetrics, FocusMetrics, LanguageShare, Metrics,
    PeakTime, PeakTimeLabel,
};
pub use profile::{
    generate_profile, generate_profile_with, profile_or_fallback, Profile, ProfileOptions,
    FALLBACK_PROFILE_VERSION, PROFILE_VERSION,
};
