use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One durable, immutable outcome of an analysis request. `resume_text`
/// and `job_description` are defensive nullable columns; the pipeline
/// always writes them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FeedbackEntry {
    pub id: i32,
    pub user_id: String,
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
    pub ai_feedback: String,
    pub created_at: DateTime<Utc>,
}
