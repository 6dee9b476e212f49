// src/models/participant.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::jwt::Claims;

/// The signed-in user the leaderboard is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Matched against `QuizResultDocument::user_id`.
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl Session {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            display_name: claims.name,
            email: claims.email,
            photo_url: claims.picture,
        }
    }
}

/// A normalized, rankable quiz result.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub name: String,

    /// Percentage in 0..=100.
    pub score: u32,
    pub raw_score: u64,
    pub total_questions: u64,
    pub elapsed_seconds: u64,
    pub completed_at: DateTime<Utc>,
    pub quiz_title: String,

    /// 1-based position in the full population. Zero until ranked.
    pub rank: usize,
    pub is_self: bool,
}
