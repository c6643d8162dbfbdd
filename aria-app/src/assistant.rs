use crate::responder::{ConversationalResponder, RetrievalResponder};
use anyhow::Result;
use aria_core::{route, IntentClassifier, ResponderKind, RouteOutcome};

pub const FAREWELL: &str = "Goodbye! Have a great day!";

#[derive(Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// One response line per executed command, in order.
    Continue(String),
    /// Farewell text; the read loop must stop.
    Exit(String),
}

/// Front-end pipeline: classify the utterance, route every command, and
/// dispatch delegations to the matching responder. Deterministic replies
/// are never recorded as conversational turns.
pub struct Assistant {
    classifier: IntentClassifier,
    retrieval: RetrievalResponder,
    conversational: ConversationalResponder,
}

impl Assistant {
    pub fn new(
        classifier: IntentClassifier,
        retrieval: RetrievalResponder,
        conversational: ConversationalResponder,
    ) -> Self {
        Self {
            classifier,
            retrieval,
            conversational,
        }
    }

    pub async fn handle(&self, utterance: &str) -> Result<SessionOutcome> {
        let commands = self.classifier.classify(utterance).await;
        tracing::debug!("classified into {} command(s)", commands.len());

        let mut replies = Vec::new();

        for command in &commands {
            match route(command) {
                RouteOutcome::Reply(text) => replies.push(text),
                RouteOutcome::Exit => return Ok(SessionOutcome::Exit(FAREWELL.to_string())),
                RouteOutcome::Delegate(kind) => {
                    // Delegations answer the command argument; the fallback
                    // path already carries the whole utterance there.
                    let query = command
                        .arg
                        .clone()
                        .unwrap_or_else(|| utterance.to_string());

                    let text = match kind {
                        ResponderKind::Retrieval => self.retrieval.answer(&query).await?,
                        ResponderKind::Conversational => {
                            self.conversational.answer(&query).await?
                        }
                    };
                    replies.push(text);
                }
            }
        }

        Ok(SessionOutcome::Continue(replies.join("\n")))
    }
}
