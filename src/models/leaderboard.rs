// src/models/leaderboard.rs

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::format::format_time;

/// Time window applied to the ranked population before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeFilter {
    /// Maximum age (exclusive) of a result kept by this filter. `None` keeps everything.
    pub fn window(self) -> Option<TimeDelta> {
        match self {
            TimeFilter::All => None,
            TimeFilter::Today => Some(TimeDelta::hours(24)),
            TimeFilter::Week => Some(TimeDelta::days(7)),
            TimeFilter::Month => Some(TimeDelta::days(30)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeFilter::All => "All Time",
            TimeFilter::Today => "today",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
        }
    }
}

/// Display ordering of the filtered list. Never changes `rank`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    Time,
    Date,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Time => "time",
            SortKey::Date => "date",
        }
    }
}

/// Query parameters for `GET /api/leaderboard`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub filter: TimeFilter,

    #[serde(default)]
    pub sort: SortKey,

    /// Number of pages to accumulate (default: 1).
    #[validate(range(min = 1, max = 50, message = "page must be between 1 and 50"))]
    pub page: Option<usize>,
}

/// Population-wide figures, computed once per load over the full ranked set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub count: usize,
    pub mean_score: u32,
    pub mean_elapsed_seconds: u64,
    pub max_score: u32,
    pub min_elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizInfo {
    pub title: String,
    pub total_participants: usize,
    pub average_score: u32,
    pub average_time: String,
}

impl QuizInfo {
    pub fn new(title: &str, aggregates: &Aggregates) -> Self {
        Self {
            title: title.to_string(),
            total_participants: aggregates.count,
            average_score: aggregates.mean_score,
            average_time: format_time(aggregates.mean_elapsed_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub highest_score: u32,
    pub fastest_time: String,
    pub total_attempts: usize,
    pub average_score: u32,
}

impl From<&Aggregates> for Statistics {
    fn from(aggregates: &Aggregates) -> Self {
        Self {
            highest_score: aggregates.max_score,
            fastest_time: format_time(aggregates.min_elapsed_seconds),
            total_attempts: aggregates.count,
            average_score: aggregates.mean_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodiumEntry {
    pub place: usize,
    pub name: String,
    pub score: u32,
    pub time: String,
    pub avatar_url: String,
}

/// Qualitative message shown next to the user's own rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    TopThree,
    TopTen,
    NearTopTen { spots: usize },
    Climbing,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0..=3 => RankTier::TopThree,
            4..=10 => RankTier::TopTen,
            11..=50 => RankTier::NearTopTen {
                spots: rank.abs_diff(10),
            },
            _ => RankTier::Climbing,
        }
    }

    pub fn message(self) -> String {
        match self {
            RankTier::TopThree => "🏆 You're in the top 3!".to_string(),
            RankTier::TopTen => "🌟 You're in the top 10!".to_string(),
            RankTier::NearTopTen { spots } => format!("{} spots away from top 10", spots),
            RankTier::Climbing => "Keep practicing to climb higher!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPosition {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub time: String,
    /// Width of the progress bar, in percent (never below 5).
    pub progress_percent: f64,
    pub tier: RankTier,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub avatar_url: String,
    pub name: String,
    pub is_self: bool,
    pub score: u32,
    pub elapsed_seconds: u64,
    pub time: String,
    pub completed_at: DateTime<Utc>,
    /// Short date, e.g. "Oct 17".
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Everything a render surface has been told during one page load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaderboardPage {
    pub loading: bool,
    pub account_avatar: Option<String>,
    pub quiz_info: Option<QuizInfo>,
    pub podium: Vec<PodiumEntry>,
    pub user_position: Option<UserPosition>,
    pub items: Vec<ListItem>,
    pub remaining: usize,
    pub has_more: bool,
    pub statistics: Option<Statistics>,
    pub notifications: Vec<Notification>,
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareMessage {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareMessage {
    pub fn new(board_title: &str, origin: &str) -> Self {
        Self {
            title: board_title.to_string(),
            text: format!(
                "Check out the {}! Can you beat the top scores? {}",
                board_title, origin
            ),
            url: origin.to_string(),
        }
    }
}
