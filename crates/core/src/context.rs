use crate::types::ConversationTurn;
use aria_providers::{ChatMessage, SearchResult};
use chrono::{DateTime, Local};

/// Assembles the layered prompt context sent to the generation backend.
/// Contexts are built fresh per request and never persisted.
pub struct ContextBuilder {
    assistant_name: String,
    user_name: String,
    history_window: usize,
}

impl ContextBuilder {
    pub fn new(
        assistant_name: impl Into<String>,
        user_name: impl Into<String>,
        history_window: usize,
    ) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            user_name: user_name.into(),
            history_window,
        }
    }

    /// Persona + one-shot greeting + realtime facts + search results +
    /// history window + the user query, in that order.
    pub fn retrieval_context(
        &self,
        query: &str,
        search_block: &str,
        history: &[ConversationTurn],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(self.retrieval_persona()),
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello, how can I help you?"),
            ChatMessage::system(facts_at(Local::now())),
            ChatMessage::system(search_block),
        ];

        messages.extend(self.window(history).iter().map(turn_to_message));
        messages.push(ChatMessage::user(query));
        messages
    }

    /// Chat persona + history window + the user query.
    pub fn chat_context(&self, query: &str, history: &[ConversationTurn]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.chat_persona(Local::now()))];
        messages.extend(self.window(history).iter().map(turn_to_message));
        messages.push(ChatMessage::user(query));
        messages
    }

    fn retrieval_persona(&self) -> String {
        format!(
            "Hello, I am {user}. You are a very accurate and advanced AI chatbot named \
             {assistant} which has real-time up-to-date information from the internet.\n\
             *** Provide answers in a professional way, make sure to add full stops, \
             commas, question marks, and use proper grammar. ***\n\
             *** Just answer the question from the provided data in a professional way. ***",
            user = self.user_name,
            assistant = self.assistant_name,
        )
    }

    fn chat_persona(&self, now: DateTime<Local>) -> String {
        format!(
            "You are {assistant}, a concise AI assistant. Follow:\n\
             - Answer in plain text (NO markdown)\n\
             - Keep responses under 3 sentences\n\
             - Current context: {timestamp}",
            assistant = self.assistant_name,
            timestamp = now.format("%Y-%m-%d %H:%M:%S"),
        )
    }

    /// Only the most recent turns, independent of total persisted length.
    fn window<'a>(&self, history: &'a [ConversationTurn]) -> &'a [ConversationTurn] {
        let skip = history.len().saturating_sub(self.history_window);
        &history[skip..]
    }
}

fn turn_to_message(turn: &ConversationTurn) -> ChatMessage {
    ChatMessage {
        role: turn.role.as_str().to_string(),
        content: turn.content.clone(),
    }
}

/// Delimited search-results block, title/snippet pairs in provider order.
pub fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    let mut block = format!("The search results for '{}' are:\n[start]\n", query);
    for result in results {
        block.push_str(&format!(
            "Title: {}\nDescription: {}\n\n",
            result.title, result.snippet
        ));
    }
    block.push_str("[end]");
    block
}

/// Real-time date/time facts block.
fn facts_at(now: DateTime<Local>) -> String {
    format!(
        "Use this real-time information if needed:\n\
         Day: {day}\n\
         Date: {date}\n\
         Month: {month}\n\
         Year: {year}\n\
         Time: {hour} hours, {minute} minutes, {second} seconds.",
        day = now.format("%A"),
        date = now.format("%d"),
        month = now.format("%B"),
        year = now.format("%Y"),
        hour = now.format("%H"),
        minute = now.format("%M"),
        second = now.format("%S"),
    )
}
