//! # ghwrapped-core
//!
//! Core library for ghwrapped - a year-in-review for GitHub activity.
//!
//! This library provides:
//! - Raw event types mirroring the GitHub GraphQL payloads
//! - A GitHub collector that gathers one calendar year of activity
//! - A pure, deterministic profile engine (metrics, behaviors, labels)
//! - Optional LLM narratives for a finished profile
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Collect:** GitHub GraphQL responses become [`RawEvents`]
//! - **Profile:** [`RawEvents`] become a versioned [`Profile`] with no I/O
//! - **Narrate:** a [`Profile`] may be described in prose by an LLM
//!
//! ## Example
//!
//! ```rust,no_run
//! use ghwrapped_core::{profile_or_fallback, ProfileOptions, RawEvents};
//!
//! let raw = RawEvents::from_path("raw.json".as_ref()).expect("failed to read raw events");
//! let profile = profile_or_fallback(&raw, &ProfileOptions::default());
//! println!("{}", profile.to_json_pretty().expect("failed to serialize"));
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    generate_profile, generate_profile_with, profile_or_fallback, Behaviors, Label, Metrics,
    Profile, ProfileOptions,
};
pub use config::Config;
pub use error::{Error, Result};
pub use period::YearWindow;
pub use types::*;

// Public modules
pub mod analytics;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod narrative;
pub mod period;
pub mod types;
