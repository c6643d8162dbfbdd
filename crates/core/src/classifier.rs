use crate::parser::parse_commands;
use crate::types::Command;
use aria_providers::{ChatBackend, ChatMessage, CompletionRequest};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const MAX_UTTERANCE_CHARS: usize = 500;
const CLASSIFY_TEMPERATURE: f32 = 0.2;
const CLASSIFY_MAX_TOKENS: u32 = 50;
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

const RULES_PREAMBLE: &str = "\
You are a query classifier. Follow these rules strictly:

1. SYSTEM COMMANDS (highest priority): time/date requests
2. EXIT: only respond with 'exit' for explicit goodbye messages
3. GREETINGS: always classify as 'general'
4. MULTI-COMMANDS: split requests using 'and' or commas
5. FUNCTION PRIORITY:
   - system
   - open/close [app]
   - play [song]
   - reminder [time+message]
   - generate image [description]
   - content [topic]
   - youtube/google search [query]
6. KNOWLEDGE:
   - realtime: people/companies, news, current events
   - general: concepts, history, how-tos, greetings
7. PROPER NOUNS: capitalized names -> realtime
8. DEFAULT: general

Respond ONLY with the command format.";

/// Classifies utterances into commands via the chat backend, with a
/// bounded memoization cache keyed by the verbatim utterance.
pub struct IntentClassifier {
    backend: Arc<dyn ChatBackend>,
    cache: Mutex<LruCache<String, Vec<Command>>>,
}

impl IntentClassifier {
    pub fn new(backend: Arc<dyn ChatBackend>, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity.max(1)).unwrap_or(NonZeroUsize::MIN);

        Self {
            backend,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Classify an utterance. Infallible: backend errors degrade to the
    /// heuristic fallback over the raw utterance.
    pub async fn classify(&self, utterance: &str) -> Vec<Command> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(utterance) {
                tracing::debug!("classification cache hit");
                return hit.clone();
            }
        }

        let request = CompletionRequest {
            messages: self.build_messages(&sanitize(utterance)),
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: CLASSIFY_MAX_TOKENS,
        };

        match self.backend.complete(request).await {
            Ok(response) => {
                let commands = parse_commands(&response, utterance);
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(utterance.to_string(), commands.clone());
                }
                commands
            }
            Err(e) => {
                // Failures are not cached so a recovered backend gets asked again.
                tracing::warn!("classification backend failed: {}", e);
                parse_commands("", utterance)
            }
        }
    }

    fn build_messages(&self, utterance: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(RULES_PREAMBLE)];
        for (user, assistant) in exemplars() {
            messages.push(ChatMessage::user(user));
            messages.push(ChatMessage::assistant(assistant));
        }
        messages.push(ChatMessage::user(utterance));
        messages
    }
}

/// Few-shot exemplar turns sent before the real utterance.
fn exemplars() -> [(&'static str, &'static str); 5] {
    [
        ("What time is it?", "system time"),
        ("What's today's date?", "system date"),
        ("Hello!", "general hello"),
        ("Open Chrome and Notepad", "open chrome, open notepad"),
        ("Who is Tim Cook?", "realtime tim cook"),
    ]
}

fn sanitize(utterance: &str) -> String {
    utterance
        .trim()
        .chars()
        .take(MAX_UTTERANCE_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}
