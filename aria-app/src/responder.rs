use anyhow::Result;
use aria_core::{format_search_results, ContextBuilder};
use aria_memory::{HistoryStore, QuotaTracker};
use aria_providers::{ChatBackend, CompletionRequest, ProviderError, SearchBackend};
use std::sync::Arc;

pub const QUOTA_LIMIT_MESSAGE: &str =
    "Monthly search limit reached. Please try again on the first of next month.";
pub const APOLOGY_MESSAGE: &str = "Apologies, I encountered an error. Please try again.";

const END_OF_TURN_MARKER: &str = "</s>";
const GENERATION_TEMPERATURE: f32 = 0.7;
const RETRIEVAL_MAX_TOKENS: u32 = 2048;
const CHAT_MAX_TOKENS: u32 = 300;

/// Strip the end-of-turn marker and collapse blank lines, keeping the order
/// of non-empty lines.
pub fn tidy_answer(raw: &str) -> String {
    raw.replace(END_OF_TURN_MARKER, "")
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

async fn collect_stream(
    backend: &dyn ChatBackend,
    request: CompletionRequest,
) -> Result<String, ProviderError> {
    let mut rx = backend.complete_stream(request).await?;
    let mut answer = String::new();
    while let Some(fragment) = rx.recv().await {
        answer.push_str(&fragment);
    }
    Ok(answer)
}

/// Retrieval-augmented path: quota gate, web search, layered context,
/// streamed generation, durable history append.
pub struct RetrievalResponder {
    backend: Arc<dyn ChatBackend>,
    search: Arc<dyn SearchBackend>,
    quota: Arc<QuotaTracker>,
    history: Arc<HistoryStore>,
    context: Arc<ContextBuilder>,
}

impl RetrievalResponder {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        search: Arc<dyn SearchBackend>,
        quota: Arc<QuotaTracker>,
        history: Arc<HistoryStore>,
        context: Arc<ContextBuilder>,
    ) -> Self {
        Self {
            backend,
            search,
            quota,
            history,
            context,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<String> {
        if !self.quota.try_consume().await? {
            return Ok(QUOTA_LIMIT_MESSAGE.to_string());
        }

        // The attempt is already counted; a failed search still surfaces
        // its reason to the user and leaves history untouched.
        let results = match self.search.search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("search backend failed: {}", e);
                return Ok(format!("Error: unable to fetch search results ({})", e));
            }
        };

        let search_block = format_search_results(query, &results);
        let history = self.history.load().await?;
        let request = CompletionRequest {
            messages: self.context.retrieval_context(query, &search_block, &history),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: RETRIEVAL_MAX_TOKENS,
        };

        let answer = match collect_stream(self.backend.as_ref(), request).await {
            Ok(raw) => tidy_answer(&raw),
            Err(e) => {
                tracing::error!("generation backend failed: {}", e);
                return Ok(format!("Error: unable to generate an answer ({})", e));
            }
        };

        self.history.append_exchange(query, &answer).await?;
        Ok(answer)
    }
}

/// Conversational path: persona + rolling history, no external retrieval.
pub struct ConversationalResponder {
    backend: Arc<dyn ChatBackend>,
    history: Arc<HistoryStore>,
    context: Arc<ContextBuilder>,
}

impl ConversationalResponder {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        history: Arc<HistoryStore>,
        context: Arc<ContextBuilder>,
    ) -> Self {
        Self {
            backend,
            history,
            context,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<String> {
        let history = self.history.load().await?;
        let request = CompletionRequest {
            messages: self.context.chat_context(query, &history),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        };

        match collect_stream(self.backend.as_ref(), request).await {
            Ok(raw) => {
                let answer = tidy_answer(&raw);
                self.history.append_exchange(query, &answer).await?;
                Ok(answer)
            }
            Err(e) => {
                // No phantom assistant turn is recorded for a failed generation.
                tracing::warn!("generation backend failed: {}", e);
                Ok(APOLOGY_MESSAGE.to_string())
            }
        }
    }
}
