use anyhow::Result;
use aria_app::{Assistant, Config, ConversationalResponder, Repl, RetrievalResponder};
use aria_core::{ContextBuilder, IntentClassifier};
use aria_memory::{HistoryStore, QuotaTracker};
use aria_providers::{ChatBackend, OpenAICompatibleBackend, SearchBackend, SerpSearchBackend};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    println!("{} ready. Type 'exit' or 'quit' to leave.", config.assistant_name);
    println!();

    let chat: Arc<dyn ChatBackend> = Arc::new(OpenAICompatibleBackend::new(
        config.llm.endpoint.clone(),
        Config::llm_api_key(),
        config.llm.model.clone(),
    ));
    let search: Arc<dyn SearchBackend> = Arc::new(SerpSearchBackend::new(
        config.search.endpoint.clone(),
        Config::search_api_key().unwrap_or_default(),
    ));

    let history = Arc::new(HistoryStore::new(config.data_dir.join("chatlog.json")));
    let quota = Arc::new(QuotaTracker::new(
        config.data_dir.join("search_count.json"),
        config.search_quota,
    ));
    let context = Arc::new(ContextBuilder::new(
        config.assistant_name.as_str(),
        config.user_name.as_str(),
        config.history_window,
    ));

    let classifier = IntentClassifier::new(chat.clone(), config.classifier_cache_size);
    let retrieval = RetrievalResponder::new(
        chat.clone(),
        search,
        quota,
        history.clone(),
        context.clone(),
    );
    let conversational = ConversationalResponder::new(chat, history, context);

    let assistant = Assistant::new(classifier, retrieval, conversational);
    Repl::new(assistant, config.assistant_name, config.user_name)
        .run()
        .await
}
