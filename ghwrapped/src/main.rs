//! ghwrapped - GitHub Year in Review CLI
//!
//! Collects a year of GitHub activity and turns it into a behavior profile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use ghwrapped_core::collector::{CollectStep, Collector};
use ghwrapped_core::config::LlmConfig;
use ghwrapped_core::narrative::{
    create_narrative_client, generate_narrative, Narrative, PromptKind,
};
use ghwrapped_core::{
    profile_or_fallback, Config, Profile, ProfileOptions, RawEvents, YearWindow,
};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_WIDTH: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "ghwrapped")]
#[command(about = "GitHub Wrapped - Your Year in Review")]
#[command(version)]
struct Args {
    /// Year to generate wrapped for (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// GitHub login to report on (default: the token's owner)
    #[arg(long)]
    login: Option<String>,

    /// GitHub token (overrides config)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Read raw events from a JSON file instead of calling GitHub
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the collected raw events to a JSON file
    #[arg(long, value_name = "FILE")]
    save_raw: Option<PathBuf>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Ask the configured LLM for a written narrative
    #[arg(long)]
    narrative: bool,

    /// Minutes east of UTC used for hour-of-day metrics (default: host offset)
    #[arg(long, value_name = "MINUTES", allow_negative_numbers = true)]
    utc_offset: Option<i32>,
}

enum OutputFormat {
    Terminal,
    Markdown,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = ghwrapped_core::logging::init(&config.logging).ok();

    let format = match args.export.as_deref() {
        None => OutputFormat::Terminal,
        Some("md") => OutputFormat::Markdown,
        Some("json") => OutputFormat::Json,
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
    };

    let window = match args.year {
        Some(year) => {
            YearWindow::new(year).with_context(|| format!("Invalid year: {}", year))?
        }
        None => YearWindow::current(),
    };
    let options = resolve_profile_options(args.utc_offset, &config)?;

    let raw = match &args.input {
        Some(path) => load_raw(path),
        None => Some(collect_raw(&args, &config, &window)?),
    };

    if let (Some(path), Some(raw)) = (&args.save_raw, &raw) {
        let json = serde_json::to_string_pretty(raw)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write raw events to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Raw events saved");
    }

    let profile = match &raw {
        Some(raw) => profile_or_fallback(raw, &options),
        None => Profile::fallback(),
    };

    let narratives = if args.narrative {
        generate_narratives(&config.llm, &profile)
    } else {
        Vec::new()
    };

    match format {
        OutputFormat::Json => print_json(&profile, &narratives)?,
        OutputFormat::Markdown => print_markdown(&profile, &window, &narratives),
        OutputFormat::Terminal => print_terminal(&profile, &window, &narratives),
    }

    Ok(())
}

/// `--utc-offset`, then `[profile].utc_offset_minutes`, then the host offset.
fn resolve_profile_options(flag: Option<i32>, config: &Config) -> Result<ProfileOptions> {
    match flag.or(config.profile.utc_offset_minutes) {
        Some(minutes) => ProfileOptions::with_offset_minutes(minutes)
            .with_context(|| format!("UTC offset out of range: {} minutes", minutes)),
        None => Ok(ProfileOptions::local()),
    }
}

/// Load raw events from disk; a bad file degrades to the fallback profile.
fn load_raw(path: &Path) -> Option<RawEvents> {
    match RawEvents::from_path(path) {
        Ok(raw) => Some(raw),
        Err(e) => {
            eprintln!(
                "warning: could not read raw events from {}: {}",
                path.display(),
                e
            );
            eprintln!("warning: showing the fallback profile");
            tracing::warn!(path = %path.display(), error = %e, "Unreadable raw events");
            None
        }
    }
}

/// Collect a year of activity from GitHub with a spinner on stderr.
fn collect_raw(args: &Args, config: &Config, window: &YearWindow) -> Result<RawEvents> {
    let collector = Collector::new(&config.github, args.token.as_deref())
        .context("failed to set up the GitHub collector")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result: Result<RawEvents> = runtime.block_on(async {
        let login = match &args.login {
            Some(login) => login.clone(),
            None => {
                pb.set_message("Resolving GitHub user");
                collector
                    .fetch_viewer()
                    .await
                    .context("failed to resolve the token's user")?
                    .login
            }
        };

        collector
            .collect(&login, window, |step: CollectStep| {
                pb.set_message(step.description())
            })
            .await
            .with_context(|| format!("failed to collect activity for {}", login))
    });

    pb.finish_and_clear();
    result
}

/// Request every narrative kind; failures are reported and skipped.
fn generate_narratives(llm: &LlmConfig, profile: &Profile) -> Vec<Narrative> {
    let client = match create_narrative_client(llm) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("warning: narrative skipped: {}", e);
            return Vec::new();
        }
    };

    PromptKind::ALL
        .iter()
        .filter_map(
            |kind| match generate_narrative(client.as_ref(), llm, profile, *kind) {
                Ok(narrative) => Some(narrative),
                Err(e) => {
                    eprintln!("warning: {:?} narrative failed: {}", kind, e);
                    tracing::warn!(kind = ?kind, error = %e, "Narrative failed");
                    None
                }
            },
        )
        .collect()
}

fn print_terminal(profile: &Profile, window: &YearWindow, narratives: &[Narrative]) {
    let title = format!("🎉 YOUR {} GITHUB WRAPPED 🎉", window.display_name());

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if profile.is_fallback() {
        println!("  Profile unavailable. Showing empty results.");
        println!();
    }

    let activity = &profile.metrics.activity;
    let focus = &profile.metrics.focus;
    let collab = &profile.metrics.collaboration;

    // Activity
    if activity.total_contributions == 0 && activity.active_days == 0 {
        println!("  No calendar activity found for this year.");
        println!();
    } else {
        println!("📊 ACTIVITY");
        println!(
            "   Contributions: {:<10} Active days: {}",
            activity.total_contributions, activity.active_days
        );
        println!(
            "   Peak day:      {:<10} ({} contributions)",
            day_display(&activity.peak_day.date),
            activity.peak_day.contribution_count
        );
        println!(
            "   Peak time:     {:<10} ({}:00, {} events)",
            activity.peak_time.label.as_str(),
            activity.peak_time.hour,
            activity.peak_time.count
        );
        println!(
            "   Weekends:      {:<10} New projects: {}",
            percent(activity.weekend_ratio),
            activity.created_project_count
        );
        println!();
    }

    // Focus
    println!("🎯 FOCUS");
    println!(
        "   Repositories:  {:<10} Top repo share: {}",
        focus.repo_count,
        percent(focus.top_repo_ratio)
    );
    println!("   Main language: {}", focus.main_language);
    for (i, lang) in focus.top_languages.iter().enumerate() {
        let rank = match i {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "  ",
        };
        println!("   {} {}", rank, lang.name);
    }
    println!();

    // Collaboration
    println!("🤝 COLLABORATION");
    println!(
        "   Pull requests: {:<10} Merged: {}",
        collab.total_prs,
        percent(collab.merged_ratio)
    );
    println!(
        "   Reviews:       {:<10} Issues: {}",
        collab.review_count, collab.issue_count
    );
    println!();

    // Scores
    let behaviors = &profile.behaviors;
    println!("📈 SCORES");
    for (name, score) in [
        ("Focus", behaviors.focus_score),
        ("Consistency", behaviors.consistency_score),
        ("Collaboration", behaviors.collaboration_score),
        ("Burstiness", behaviors.burstiness_score),
    ] {
        println!("   {:<14} {} {:.2}", name, score_bar(score), score);
    }
    println!();

    // Labels
    if !profile.labels.is_empty() {
        println!("🏷️  YOUR LABELS");
        for label in &profile.labels {
            println!("   {} {:<20} \"{}\"", label.emoji(), label.name(), label.tagline());
        }
        println!();
    }

    for narrative in narratives {
        match narrative.kind {
            PromptKind::OneSentence => println!("💬 \"{}\"", narrative.text),
            PromptKind::MainNarrative => {
                println!("📝 YOUR YEAR");
                println!("{}", narrative.text);
            }
        }
        println!();
    }
}

fn print_markdown(profile: &Profile, window: &YearWindow, narratives: &[Narrative]) {
    println!("# 🎉 {} GitHub Wrapped 🎉", window.display_name());
    println!();

    if profile.is_fallback() {
        println!("*Profile unavailable. Showing empty results.*");
        println!();
    }

    let activity = &profile.metrics.activity;
    let focus = &profile.metrics.focus;
    let collab = &profile.metrics.collaboration;

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Contributions | {} |", activity.total_contributions);
    println!("| Active Days | {} |", activity.active_days);
    println!(
        "| Peak Day | {} ({}) |",
        day_display(&activity.peak_day.date),
        activity.peak_day.contribution_count
    );
    println!("| Weekend Share | {} |", percent(activity.weekend_ratio));
    println!("| New Projects | {} |", activity.created_project_count);
    println!("| Repositories | {} |", focus.repo_count);
    println!("| Top Repo Share | {} |", percent(focus.top_repo_ratio));
    println!("| Pull Requests | {} |", collab.total_prs);
    println!("| Merged | {} |", percent(collab.merged_ratio));
    println!("| Reviews | {} |", collab.review_count);
    println!("| Issues | {} |", collab.issue_count);
    println!();

    // Rhythm
    println!("## Rhythm");
    println!();
    println!(
        "- **Peak time:** {} ({}:00)",
        activity.peak_time.label.as_str(),
        activity.peak_time.hour
    );
    println!("- **Main language:** {}", focus.main_language);
    if !focus.top_languages.is_empty() {
        let names: Vec<&str> = focus.top_languages.iter().map(|l| l.name.as_str()).collect();
        println!("- **Top languages:** {}", names.join(", "));
    }
    println!();

    // Scores
    let behaviors = &profile.behaviors;
    println!("## Scores");
    println!();
    println!("| Behavior | Score |");
    println!("|----------|-------|");
    println!("| Focus | {:.2} |", behaviors.focus_score);
    println!("| Consistency | {:.2} |", behaviors.consistency_score);
    println!("| Collaboration | {:.2} |", behaviors.collaboration_score);
    println!("| Burstiness | {:.2} |", behaviors.burstiness_score);
    println!();

    // Labels
    if !profile.labels.is_empty() {
        println!("## Labels");
        println!();
        for label in &profile.labels {
            println!(
                "{} **{}** - *\"{}\"*",
                label.emoji(),
                label.name(),
                label.tagline()
            );
        }
        println!();
    }

    // Narrative
    if !narratives.is_empty() {
        println!("## Your Year");
        println!();
        for narrative in narratives {
            match narrative.kind {
                PromptKind::OneSentence => println!("> {}", narrative.text),
                PromptKind::MainNarrative => println!("{}", narrative.text),
            }
            println!();
        }
    }

    println!("---");
    println!("*Generated by ghwrapped ({})*", profile.profile_version);
}

/// The profile, with a `narratives` array when any were generated.
fn print_json(profile: &Profile, narratives: &[Narrative]) -> Result<()> {
    let mut json = serde_json::to_value(profile)?;
    if !narratives.is_empty() {
        if let Some(object) = json.as_object_mut() {
            object.insert("narratives".to_string(), serde_json::to_value(narratives)?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// "2025-03-14" -> "Mar 14"; anything else is shown as-is.
fn day_display(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%b %d").to_string(),
        Err(_) if date.is_empty() => "-".to_string(),
        Err(_) => date.to_string(),
    }
}
