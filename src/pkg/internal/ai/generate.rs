use std::{sync::Arc, time::Duration};

use ai::{
    chat_completions::{ChatCompletion, ChatCompletionMessage, ChatCompletionRequestBuilder},
    clients::openai::Client,
};
use async_trait::async_trait;

use crate::{conf::settings, pkg::internal::errors::AiProviderError, prelude::Result};

#[async_trait]
pub trait GenerateOps {
    /// Single blocking round trip to the evaluation backend. No streaming,
    /// no retries; the only cancellation surface is the bounded timeout.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl GenerateOps for Arc<Client> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequestBuilder::default()
            .model(&settings.ai_model)
            .messages(vec![ChatCompletionMessage::User(prompt.to_string().into())])
            .build()
            .map_err(|e| {
                tracing::error!("completion request build failed: {}", e);
                AiProviderError::Unavailable
            })?;
        let response = tokio::time::timeout(
            Duration::from_secs(settings.ai_timeout_secs),
            self.chat_completions(&request),
        )
        .await
        .map_err(|_| {
            tracing::error!(
                "evaluation backend timed out after {}s",
                settings.ai_timeout_secs
            );
            AiProviderError::Unavailable
        })?
        .map_err(|e| classify(&e.to_string()))?;
        let answer = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();
        if answer.trim().is_empty() {
            return Err(AiProviderError::EmptyCompletion.into());
        }
        Ok(answer)
    }
}

fn classify(detail: &str) -> AiProviderError {
    tracing::error!("evaluation backend call failed: {}", detail);
    let lowered = detail.to_lowercase();
    if detail.contains("429") || lowered.contains("rate limit") || lowered.contains("too many requests") {
        AiProviderError::RateLimited
    } else {
        AiProviderError::Unavailable
    }
}
