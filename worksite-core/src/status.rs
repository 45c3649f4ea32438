//! Project status and work stage identifiers.
//!
//! Statuses form a fixed ordered set. Older records and older backends use
//! Chinese labels instead of the canonical codes; both parse to the same
//! variant.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Lifecycle status of a project, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    FinalPaymentReceived,
}

const ALL_STATUSES: &[ProjectStatus] = &[
    ProjectStatus::NotStarted,
    ProjectStatus::InProgress,
    ProjectStatus::Completed,
    ProjectStatus::FinalPaymentReceived,
];

impl ProjectStatus {
    /// Canonical wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::FinalPaymentReceived => "final_payment_received",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::FinalPaymentReceived => "Final payment received",
        }
    }

    /// Label stored by legacy records.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Self::NotStarted => "未开始",
            Self::InProgress => "施工中",
            Self::Completed => "完成",
            Self::FinalPaymentReceived => "尾款已收到",
        }
    }

    /// All statuses in workflow order.
    pub fn all() -> &'static [ProjectStatus] {
        ALL_STATUSES
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = ParseError;

    /// Parse a canonical code, a legacy label, or a loose spelling such as
    /// `in-progress` / `In Progress`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let folded = trimmed.to_lowercase().replace(['-', ' '], "_");
        for &status in ALL_STATUSES {
            if status.code() == folded || status.legacy_label() == trimmed {
                return Ok(status);
            }
        }
        Err(ParseError::Status(s.to_string()))
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Stages ──────────────────────────────────────────────────────────────────

/// A unit of work on site. Declaration order is display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Repair,
    Install,
    Transport,
    Purchase,
    Frame,
    Glass,
}

const ALL_STAGES: &[Stage] = &[
    Stage::Repair,
    Stage::Install,
    Stage::Transport,
    Stage::Purchase,
    Stage::Frame,
    Stage::Glass,
];

impl Stage {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Repair => "repair",
            Self::Install => "install",
            Self::Transport => "transport",
            Self::Purchase => "purchase",
            Self::Frame => "frame",
            Self::Glass => "glass",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Repair => "Repair",
            Self::Install => "Install",
            Self::Transport => "Transport",
            Self::Purchase => "Purchase",
            Self::Frame => "Frame",
            Self::Glass => "Glass",
        }
    }

    pub fn all() -> &'static [Stage] {
        ALL_STAGES
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Stage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_STAGES
            .iter()
            .copied()
            .find(|stage| stage.key() == lower)
            .ok_or_else(|| ParseError::Stage(s.to_string()))
    }
}

/// Set of active stages on a project.
///
/// On the wire this is an object of `{ "<stage>": bool }`; a list of stage
/// keys is accepted as well. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stages(BTreeSet<Stage>);

impl Stages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, stage: Stage, active: bool) {
        if active {
            self.0.insert(stage);
        } else {
            self.0.remove(&stage);
        }
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.0.contains(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest-priority active stage.
    pub fn primary(&self) -> Option<Stage> {
        self.0.iter().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Stage> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Stage> for Stages {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Stages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&str, bool> = ALL_STAGES
            .iter()
            .map(|stage| (stage.key(), self.contains(*stage)))
            .collect();
        map.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StagesRepr {
    Flags(BTreeMap<String, Option<bool>>),
    Keys(Vec<String>),
}

impl<'de> Deserialize<'de> for Stages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Option::<StagesRepr>::deserialize(deserializer)?;
        let stages = match repr {
            None => Stages::new(),
            Some(StagesRepr::Flags(flags)) => flags
                .into_iter()
                .filter(|(_, on)| on.unwrap_or(false))
                .filter_map(|(key, _)| key.parse().ok())
                .collect(),
            Some(StagesRepr::Keys(keys)) => keys.iter().filter_map(|k| k.parse().ok()).collect(),
        };
        Ok(stages)
    }
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
