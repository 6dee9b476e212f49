// src/models/quiz_result.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A stored quiz result, as read from the `quiz_results` table or a JSON seed file.
/// Every field except `id` may be missing in older documents.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultDocument {
    pub id: String,

    /// Number of correctly answered questions.
    #[serde(default, deserialize_with = "round_number")]
    pub score: Option<i64>,

    /// Number of questions in the attempt.
    #[serde(default, deserialize_with = "round_number")]
    pub total: Option<i64>,

    /// Seconds spent on the attempt.
    #[serde(default, deserialize_with = "round_number")]
    pub time_taken: Option<i64>,

    #[serde(default)]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_first_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub quiz_title: Option<String>,
}

/// Accepts any JSON number; fractional values are rounded to the nearest integer.
fn round_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|n| n.round() as i64))
}
