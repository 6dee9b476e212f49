// src/services/result_store.rs

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{error::AppError, models::quiz_result::QuizResultDocument};

/// Source of stored quiz results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// The `limit` most recently completed results, newest first.
    async fn recent_results(&self, limit: usize) -> Result<Vec<QuizResultDocument>, AppError>;
}

/// Results stored in the `quiz_results` Postgres table.
#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn recent_results(&self, limit: usize) -> Result<Vec<QuizResultDocument>, AppError> {
        let rows = sqlx::query_as::<_, QuizResultDocument>(
            r#"
            SELECT
                id::TEXT AS id,
                score,
                total,
                time_taken,
                completed_at,
                user_id,
                user_first_name,
                user_name,
                quiz_title
            FROM quiz_results
            ORDER BY completed_at DESC NULLS LAST
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz results: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(rows)
    }
}

/// In-process store. Used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    documents: RwLock<Vec<QuizResultDocument>>,
}

impl MemoryResultStore {
    pub fn new(documents: Vec<QuizResultDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Parses a JSON array of result documents (camelCase field names).
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let documents: Vec<QuizResultDocument> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("invalid result documents: {}", e)))?;
        Ok(Self::new(documents))
    }

    pub async fn insert(&self, document: QuizResultDocument) {
        self.documents.write().await.push(document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn recent_results(&self, limit: usize) -> Result<Vec<QuizResultDocument>, AppError> {
        let mut documents = self.documents.read().await.clone();
        // Newest first; undated documents sort last, like NULLS LAST.
        documents.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        documents.truncate(limit);
        Ok(documents)
    }
}
