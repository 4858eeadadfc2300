//! Label mapping
//!
//! Tags a profile with short descriptive labels. Rules are independent
//! threshold checks evaluated in table order; every rule that holds adds
//! its label, and no rule suppresses another.

use serde::{Deserialize, Serialize};

use super::{Behaviors, Metrics};

/// Descriptive profile labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Most commits land in one repository
    #[serde(rename = "High Focus")]
    HighFocus,
    /// Commits spread thinly over many repositories
    Explorer,
    /// Large share of active days on weekends
    #[serde(rename = "Weekend Warrior")]
    WeekendWarrior,
    /// Almost no weekend activity
    #[serde(rename = "Work-Life Balanced")]
    WorkLifeBalanced,
    /// High PR + review volume
    Collaborator,
    /// Many reviews submitted
    #[serde(rename = "Code Reviewer")]
    CodeReviewer,
    /// Nearly every PR merged
    #[serde(rename = "Ship It!")]
    ShipIt,
    /// Active on most days of the year
    Consistent,
    /// Peak day far above the average day
    Sprinter,
}

impl Label {
    /// Get the display name for this label (also its serialized form).
    pub fn name(&self) -> &'static str {
        match self {
            Label::HighFocus => "High Focus",
            Label::Explorer => "Explorer",
            Label::WeekendWarrior => "Weekend Warrior",
            Label::WorkLifeBalanced => "Work-Life Balanced",
            Label::Collaborator => "Collaborator",
            Label::CodeReviewer => "Code Reviewer",
            Label::ShipIt => "Ship It!",
            Label::Consistent => "Consistent",
            Label::Sprinter => "Sprinter",
        }
    }

    /// Get the tagline for this label.
    pub fn tagline(&self) -> &'static str {
        match self {
            Label::HighFocus => "One repository got most of your attention",
            Label::Explorer => "Many repositories, a little bit each",
            Label::WeekendWarrior => "Saturdays and Sundays are for shipping",
            Label::WorkLifeBalanced => "Weekends stayed quiet",
            Label::Collaborator => "Pull requests and reviews, all year long",
            Label::CodeReviewer => "Other people's code got your eyes too",
            Label::ShipIt => "Almost every pull request made it in",
            Label::Consistent => "Showed up most days of the year",
            Label::Sprinter => "Big bursts on a few days",
        }
    }

    /// Get an emoji for this label.
    pub fn emoji(&self) -> &'static str {
        match self {
            Label::HighFocus => "🎯",
            Label::Explorer => "🧭",
            Label::WeekendWarrior => "⚔️",
            Label::WorkLifeBalanced => "⚖️",
            Label::Collaborator => "🤝",
            Label::CodeReviewer => "🔍",
            Label::ShipIt => "🚀",
            Label::Consistent => "📅",
            Label::Sprinter => "⚡",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

type Rule = fn(&Behaviors, &Metrics) -> bool;

/// Label rules in evaluation order.
const LABEL_RULES: [(Label, Rule); 9] = [
    (Label::HighFocus, high_focus),
    (Label::Explorer, explorer),
    (Label::WeekendWarrior, weekend_warrior),
    (Label::WorkLifeBalanced, work_life_balanced),
    (Label::Collaborator, collaborator),
    (Label::CodeReviewer, code_reviewer),
    (Label::ShipIt, ship_it),
    (Label::Consistent, consistent),
    (Label::Sprinter, sprinter),
];

fn high_focus(b: &Behaviors, _: &Metrics) -> bool {
    b.focus_score > 0.7
}

fn explorer(b: &Behaviors, m: &Metrics) -> bool {
    b.focus_score < 0.3 && m.focus.repo_count > 10
}

fn weekend_warrior(_: &Behaviors, m: &Metrics) -> bool {
    m.activity.weekend_ratio > 0.3
}

// A zero ratio over zero active days says nothing about balance.
fn work_life_balanced(_: &Behaviors, m: &Metrics) -> bool {
    m.activity.active_days > 0 && m.activity.weekend_ratio < 0.05
}

fn collaborator(b: &Behaviors, _: &Metrics) -> bool {
    b.collaboration_score > 0.6
}

fn code_reviewer(_: &Behaviors, m: &Metrics) -> bool {
    m.collaboration.review_count > 20
}

fn ship_it(_: &Behaviors, m: &Metrics) -> bool {
    m.collaboration.merged_ratio > 0.9
}

fn consistent(b: &Behaviors, _: &Metrics) -> bool {
    b.consistency_score > 0.6
}

fn sprinter(b: &Behaviors, _: &Metrics) -> bool {
    b.burstiness_score > 0.7
}

/// Every label whose rule holds, in rule order. May be empty.
pub fn map_labels(behaviors: &Behaviors, metrics: &Metrics) -> Vec<Label> {
    LABEL_RULES
        .iter()
        .filter(|(_, rule)| rule(behaviors, metrics))
        .map(|(label, _)| *label)
        .collect()
}
