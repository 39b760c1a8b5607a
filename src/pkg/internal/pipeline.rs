use async_trait::async_trait;

use crate::{
    pkg::internal::{
        adaptors::feedback::{mutators::FeedbackMutator, spec::FeedbackEntry},
        ai::generate::GenerateOps,
        auth::Identity,
        prompt,
    },
    prelude::Result,
};

#[async_trait]
pub trait FeedbackSink {
    async fn persist(
        &mut self,
        identity: &Identity,
        resume_text: &str,
        job_description: &str,
        ai_feedback: &str,
    ) -> Result<FeedbackEntry>;
}

#[async_trait]
impl<'a> FeedbackSink for FeedbackMutator<'a> {
    async fn persist(
        &mut self,
        identity: &Identity,
        resume_text: &str,
        job_description: &str,
        ai_feedback: &str,
    ) -> Result<FeedbackEntry> {
        self.create(&identity.user_id, resume_text, job_description, ai_feedback)
            .await
    }
}

/// Runs one analysis: validate and compile the prompt, call the evaluation
/// backend, persist the outcome, then serve it. Persist-then-serve: a
/// completion that cannot be stored is discarded and the caller sees the
/// persistence error, keeping history and live responses consistent.
pub async fn run_analysis<E, S>(
    engine: &E,
    sink: &mut S,
    identity: &Identity,
    resume_text: &str,
    job_description: &str,
) -> Result<FeedbackEntry>
where
    E: GenerateOps + Sync,
    S: FeedbackSink + Send,
{
    let prompt = prompt::compile(resume_text, job_description)?;
    let feedback = engine.complete(&prompt).await?;
    let entry = sink
        .persist(identity, resume_text, job_description, &feedback)
        .await?;
    tracing::info!(
        "analysis persisted for user {} as record {}",
        &identity.user_id,
        entry.id
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::errors::AiProviderError;
    use crate::prelude::Error;
    use tracing_test::traced_test;

    struct FakeEngine {
        outcome: core::result::Result<String, AiProviderError>,
    }

    #[async_trait]
    impl GenerateOps for FakeEngine {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            match &self.outcome {
                Ok(text) => Ok(text.clone()),
                Err(AiProviderError::Unavailable) => Err(AiProviderError::Unavailable.into()),
                Err(AiProviderError::RateLimited) => Err(AiProviderError::RateLimited.into()),
                Err(AiProviderError::EmptyCompletion) => {
                    Err(AiProviderError::EmptyCompletion.into())
                }
            }
        }
    }

    #[derive(Default)]
    struct FakeSink {
        rows: Vec<FeedbackEntry>,
        fail_writes: bool,
    }

    impl FakeSink {
        /// Mirrors the selector contract: only the given user's rows,
        /// newest first.
        fn history_for(&self, user_id: &str) -> Vec<FeedbackEntry> {
            let mut rows: Vec<FeedbackEntry> = self
                .rows
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        }
    }

    #[async_trait]
    impl FeedbackSink for FakeSink {
        async fn persist(
            &mut self,
            identity: &Identity,
            resume_text: &str,
            job_description: &str,
            ai_feedback: &str,
        ) -> Result<FeedbackEntry> {
            if self.fail_writes {
                return Err(Error::WriteFailed(sqlx::Error::PoolClosed));
            }
            let entry = FeedbackEntry {
                id: self.rows.len() as i32 + 1,
                user_id: identity.user_id.clone(),
                resume_text: Some(resume_text.to_string()),
                job_description: Some(job_description.to_string()),
                ai_feedback: ai_feedback.to_string(),
                // distinct, strictly increasing insert times
                created_at: chrono::DateTime::from_timestamp(
                    1_700_000_000 + self.rows.len() as i64,
                    0,
                )
                .expect("valid timestamp"),
            };
            self.rows.push(entry.clone());
            Ok(entry)
        }
    }

    fn identity(id: &str) -> Identity {
        Identity {
            user_id: id.to_string(),
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn engine_failure_persists_nothing() {
        let engine = FakeEngine {
            outcome: Err(AiProviderError::Unavailable),
        };
        let mut sink = FakeSink::default();
        let res = run_analysis(&engine, &mut sink, &identity("u1"), "resume", "job").await;
        assert!(matches!(
            res,
            Err(Error::AiProvider(AiProviderError::Unavailable))
        ));
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn empty_completion_persists_nothing() {
        let engine = FakeEngine {
            outcome: Err(AiProviderError::EmptyCompletion),
        };
        let mut sink = FakeSink::default();
        let res = run_analysis(&engine, &mut sink, &identity("u1"), "resume", "job").await;
        assert!(matches!(
            res,
            Err(Error::AiProvider(AiProviderError::EmptyCompletion))
        ));
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn failed_write_discards_the_completion() {
        let engine = FakeEngine {
            outcome: Ok("useful feedback".into()),
        };
        let mut sink = FakeSink {
            fail_writes: true,
            ..Default::default()
        };
        let res = run_analysis(&engine, &mut sink, &identity("u1"), "resume", "job").await;
        assert!(matches!(res, Err(Error::WriteFailed(_))));
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_engine_or_sink() {
        let engine = FakeEngine {
            outcome: Ok("should not be produced".into()),
        };
        let mut sink = FakeSink::default();
        let res = run_analysis(&engine, &mut sink, &identity("u1"), "  ", "job").await;
        assert!(matches!(res, Err(Error::EmptyField("resumeText"))));
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn success_stores_the_resolver_identity_and_verbatim_inputs() {
        let engine = FakeEngine {
            outcome: Ok("structured feedback".into()),
        };
        let mut sink = FakeSink::default();
        let entry = run_analysis(
            &engine,
            &mut sink,
            &identity("u1"),
            "Experienced backend engineer...",
            "Seeking Go developer...",
        )
        .await
        .expect("analysis succeeds");
        assert_eq!(entry.user_id, "u1");
        assert_eq!(entry.ai_feedback, "structured feedback");
        assert_eq!(
            entry.resume_text.as_deref(),
            Some("Experienced backend engineer...")
        );
        assert_eq!(
            entry.job_description.as_deref(),
            Some("Seeking Go developer...")
        );
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.rows[0].ai_feedback, entry.ai_feedback);
    }

    #[tokio::test]
    async fn history_is_scoped_to_one_identity() {
        let engine = FakeEngine {
            outcome: Ok("feedback".into()),
        };
        let mut sink = FakeSink::default();
        run_analysis(&engine, &mut sink, &identity("a"), "resume a", "job a")
            .await
            .unwrap();
        run_analysis(&engine, &mut sink, &identity("b"), "resume b", "job b")
            .await
            .unwrap();
        run_analysis(&engine, &mut sink, &identity("a"), "resume a2", "job a2")
            .await
            .unwrap();

        let for_a = sink.history_for("a");
        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|r| r.user_id == "a"));
        let for_b = sink.history_for("b");
        assert_eq!(for_b.len(), 1);
        assert!(for_b.iter().all(|r| r.user_id == "b"));
        assert!(sink.history_for("c").is_empty());
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let engine = FakeEngine {
            outcome: Ok("feedback".into()),
        };
        let mut sink = FakeSink::default();
        for n in 0..4 {
            run_analysis(
                &engine,
                &mut sink,
                &identity("u1"),
                &format!("resume v{}", n),
                "job",
            )
            .await
            .unwrap();
        }
        let history = sink.history_for("u1");
        assert_eq!(history.len(), 4);
        for pair in history.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(history[0].resume_text.as_deref(), Some("resume v3"));
        assert_eq!(history[3].resume_text.as_deref(), Some("resume v0"));
    }
}
