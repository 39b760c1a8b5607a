use sqlx::PgConnection;

use crate::pkg::internal::adaptors::feedback::spec::FeedbackEntry;
use crate::prelude::{Error, Result};

pub struct FeedbackMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> FeedbackMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        FeedbackMutator { pool }
    }

    pub async fn create(
        &mut self,
        user_id: &str,
        resume_text: &str,
        job_description: &str,
        ai_feedback: &str,
    ) -> Result<FeedbackEntry> {
        let row = sqlx::query_as::<_, FeedbackEntry>(
            r#"
            INSERT INTO feedback (user_id, resume_text, job_description, ai_feedback)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, resume_text, job_description, ai_feedback, created_at
            "#,
        )
        .bind(user_id)
        .bind(resume_text)
        .bind(job_description)
        .bind(ai_feedback)
        .fetch_one(&mut *self.pool)
        .await
        .map_err(|e| {
            tracing::error!("feedback insert failed: {}", e);
            Error::WriteFailed(e)
        })?;

        Ok(row)
    }
}
