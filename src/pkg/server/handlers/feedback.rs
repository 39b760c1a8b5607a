use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    pkg::{
        internal::{
            adaptors::feedback::{
                mutators::FeedbackMutator, selectors::FeedbackSelector, spec::FeedbackEntry,
            },
            auth::Identity,
            pipeline::run_analysis,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeInput {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Serialize)]
pub struct AnalyzeOutput {
    pub feedback: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    Extension(identity): Extension<Arc<Identity>>,
    Json(input): Json<AnalyzeInput>,
) -> Result<Json<AnalyzeOutput>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let mut sink = FeedbackMutator::new(&mut tx);
    let entry = run_analysis(
        &state.ai_client,
        &mut sink,
        identity.as_ref(),
        &input.resume_text,
        &input.job_description,
    )
    .await?;
    tx.commit().await?;
    Ok(Json(AnalyzeOutput {
        feedback: entry.ai_feedback,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Arc<Identity>>,
) -> Result<Json<Vec<FeedbackEntry>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let entries = FeedbackSelector::new(&mut tx)
        .list_for_user(&identity.user_id)
        .await?;
    Ok(Json(entries))
}
