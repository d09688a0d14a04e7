/// Domain records for the swipe screen and the moderator API

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Guy",
            Gender::Female => "Girl",
        }
    }

    /// The other choice, for the two-way toggle on the form
    pub fn toggled(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Moderation lifecycle of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Header badge text
    pub fn badge(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "On moderation",
            ModerationStatus::Approved => "Approved",
            ModerationStatus::Rejected => "Rejected",
        }
    }

    /// Profile tab text
    pub fn description(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "⏳ Being checked by a moderator",
            ModerationStatus::Approved => "✓ Profile approved",
            ModerationStatus::Rejected => "✗ Rejected",
        }
    }
}

/// A user-facing profile: the sample candidates and "my profile"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub city: String,
    pub gender: Gender,
    pub photo: String,
    pub status: ModerationStatus,
    pub bio: Option<String>,
}

/// Outcome of one like. Appended on every successful like, never pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub profile_id: i64,
    pub mutual_like: bool,
    /// Revealed only for mutual likes
    pub username: Option<String>,
}

/// Profile awaiting review, as sent by the moderator API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorProfile {
    pub id: i64,
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub name: String,
    pub age: u32,
    pub city: String,
    pub gender: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ModeratorProfile {
    pub fn gender_label(&self) -> &str {
        match self.gender.as_str() {
            "male" => Gender::Male.label(),
            "female" => Gender::Female.label(),
            other => other,
        }
    }
}

/// Abuse report, as sent by the moderator API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    #[serde(default)]
    pub reporter_name: Option<String>,
    pub reported_user_id: i64,
    #[serde(default)]
    pub reported_name: Option<String>,
    #[serde(default)]
    pub reported_telegram_id: Option<i64>,
    pub reason: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Aggregate counters computed by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_profiles: u64,
    pub approved: u64,
    pub pending: u64,
    pub rejected: u64,
    pub matches: u64,
    pub pending_reports: u64,
    pub likes_today: u64,
}
