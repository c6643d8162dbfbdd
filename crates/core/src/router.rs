use crate::types::{Command, Verb};
use chrono::Local;

pub const GREETING_REPLY: &str = "Hello! How can I assist you today?";

/// Which generative path a delegated command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    Retrieval,
    Conversational,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Deterministic local answer; never recorded as a conversational turn.
    Reply(String),
    /// The caller must delegate to the matching responder.
    Delegate(ResponderKind),
    /// Session termination sentinel; the caller stops the read loop.
    Exit,
}

/// Map a command to a local handler or a responder. Performs no I/O and
/// never calls external services.
pub fn route(command: &Command) -> RouteOutcome {
    match command.verb {
        Verb::Exit => RouteOutcome::Exit,
        Verb::System => {
            let arg = command.arg.as_deref().unwrap_or("");
            if arg.starts_with("time") {
                RouteOutcome::Reply(Local::now().format("%H:%M:%S").to_string())
            } else if arg.starts_with("date") {
                RouteOutcome::Reply(Local::now().format("%Y-%m-%d").to_string())
            } else {
                RouteOutcome::Delegate(ResponderKind::Conversational)
            }
        }
        Verb::General if command.arg.is_none() => RouteOutcome::Reply(GREETING_REPLY.to_string()),
        Verb::Realtime | Verb::YoutubeSearch | Verb::GoogleSearch | Verb::Content => {
            RouteOutcome::Delegate(ResponderKind::Retrieval)
        }
        _ => RouteOutcome::Delegate(ResponderKind::Conversational),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_system_time_format() {
        let outcome = route(&Command::new(Verb::System, "time"));
        match outcome {
            RouteOutcome::Reply(text) => {
                assert!(NaiveTime::parse_from_str(&text, "%H:%M:%S").is_ok(), "{}", text);
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_system_date_format() {
        let outcome = route(&Command::new(Verb::System, "date"));
        match outcome {
            RouteOutcome::Reply(text) => {
                assert!(NaiveDate::parse_from_str(&text, "%Y-%m-%d").is_ok(), "{}", text);
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_general_greets() {
        assert_eq!(
            route(&Command::bare(Verb::General)),
            RouteOutcome::Reply(GREETING_REPLY.to_string())
        );
    }

    #[test]
    fn test_general_with_argument_delegates() {
        assert_eq!(
            route(&Command::new(Verb::General, "tell me about quantum computing")),
            RouteOutcome::Delegate(ResponderKind::Conversational)
        );
    }

    #[test]
    fn test_exit_sentinel() {
        assert_eq!(route(&Command::bare(Verb::Exit)), RouteOutcome::Exit);
    }

    #[test]
    fn test_retrieval_verbs_delegate_to_retrieval() {
        for verb in [
            Verb::Realtime,
            Verb::YoutubeSearch,
            Verb::GoogleSearch,
            Verb::Content,
        ] {
            assert_eq!(
                route(&Command::new(verb, "anything")),
                RouteOutcome::Delegate(ResponderKind::Retrieval)
            );
        }
    }

    #[test]
    fn test_other_verbs_delegate_to_conversational() {
        for verb in [Verb::Open, Verb::Close, Verb::Play, Verb::Reminder, Verb::GenerateImage] {
            assert_eq!(
                route(&Command::new(verb, "anything")),
                RouteOutcome::Delegate(ResponderKind::Conversational)
            );
        }
        // Unrecognized system argument has no local handler.
        assert_eq!(
            route(&Command::new(Verb::System, "volume up")),
            RouteOutcome::Delegate(ResponderKind::Conversational)
        );
    }
}
