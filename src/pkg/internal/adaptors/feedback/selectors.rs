use sqlx::PgConnection;

use crate::pkg::internal::adaptors::feedback::spec::FeedbackEntry;
use crate::prelude::Result;

pub struct FeedbackSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> FeedbackSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        FeedbackSelector { pool }
    }

    /// Row-level scoping happens here in the query; callers never see
    /// another user's rows, even transiently.
    pub async fn list_for_user(&mut self, user_id: &str) -> Result<Vec<FeedbackEntry>> {
        let rows = sqlx::query_as::<_, FeedbackEntry>(
            "SELECT id, user_id, resume_text, job_description, ai_feedback, created_at
             FROM feedback WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
