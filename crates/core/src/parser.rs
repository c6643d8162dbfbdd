//! Turns raw classifier output into normalized commands.
//!
//! The split is lookahead-gated: a comma or "and" only ends a fragment when
//! the text after it starts with a known verb, so conjunctions inside an
//! argument ("reminder buy milk and eggs") never split. The `regex` crate
//! has no lookahead, hence the hand-written boundary scan.

use crate::types::{Command, Verb};

/// Split a classifier response into candidate fragments, lowercased.
pub fn split_fragments(response: &str) -> Vec<String> {
    let normalized = response.trim().to_lowercase().replace(',', " , ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut fragments = Vec::new();
    let mut start = 0;

    for i in 0..tokens.len() {
        if tokens[i] != "," && tokens[i] != "and" {
            continue;
        }
        if i <= start {
            // Boundary token leading a fragment (e.g. ", and open ...").
            start = i + 1;
            continue;
        }
        let rest = tokens[i + 1..].join(" ");
        if Verb::match_prefix(&rest).is_some() {
            push_fragment(&mut fragments, &tokens[start..i]);
            start = i + 1;
        }
    }

    if start < tokens.len() {
        push_fragment(&mut fragments, &tokens[start..]);
    }

    fragments
}

fn push_fragment(fragments: &mut Vec<String>, tokens: &[&str]) {
    let mut out = String::new();
    for token in tokens {
        if *token == "," {
            out.push(',');
        } else {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
    }
    let trimmed = out.trim_end_matches([',', ' ']).trim_start();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}

/// Validate fragments against the verb vocabulary and fall back to a
/// heuristic default when nothing parses. Pure function of its inputs;
/// the returned list is never empty.
pub fn parse_commands(response: &str, utterance: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for fragment in split_fragments(response) {
        match Verb::match_prefix(&fragment) {
            Some((verb, rest)) => commands.push(Command::new(verb, rest)),
            None => tracing::debug!("dropping unparseable fragment: {:?}", fragment),
        }
    }

    if commands.is_empty() {
        let verb = if has_proper_noun(utterance) {
            Verb::Realtime
        } else {
            Verb::General
        };
        tracing::debug!("no fragment parsed, falling back to {}", verb);
        commands.push(Command::new(verb, &utterance.trim().to_lowercase()));
    }

    commands
}

/// A capitalized token away from sentence start suggests a proper noun,
/// which steers the fallback toward the realtime path.
pub fn has_proper_noun(text: &str) -> bool {
    let mut sentence_start = true;

    for token in text.split_whitespace() {
        let capitalized = token
            .chars()
            .next()
            .map(|c| c.is_alphabetic() && c.is_uppercase())
            .unwrap_or(false);

        if capitalized && !sentence_start {
            return true;
        }

        sentence_start = token.ends_with(['.', '!', '?']);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_argument_not_split() {
        let commands = parse_commands("reminder buy milk and eggs at 5pm", "whatever");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].verb, Verb::Reminder);
        assert_eq!(commands[0].arg.as_deref(), Some("buy milk and eggs at 5pm"));
    }

    #[test]
    fn test_multi_command_split_on_and() {
        let commands = parse_commands("open chrome and open notepad", "Open Chrome and Notepad");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::new(Verb::Open, "chrome"));
        assert_eq!(commands[1], Command::new(Verb::Open, "notepad"));
    }

    #[test]
    fn test_multi_command_split_on_comma() {
        let commands = parse_commands("open chrome, open notepad", "Open Chrome and Notepad");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::new(Verb::Open, "chrome"));
        assert_eq!(commands[1], Command::new(Verb::Open, "notepad"));
    }

    #[test]
    fn test_comma_and_combination() {
        let commands = parse_commands("open chrome, and play jazz", "irrelevant");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::new(Verb::Open, "chrome"));
        assert_eq!(commands[1], Command::new(Verb::Play, "jazz"));
    }

    #[test]
    fn test_invalid_fragments_dropped() {
        let commands = parse_commands("hmm not sure, open chrome", "irrelevant");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0], Command::new(Verb::Open, "chrome"));
    }

    #[test]
    fn test_fallback_proper_noun_realtime() {
        let commands = parse_commands("gibberish output", "Who is Tim Cook?");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].verb, Verb::Realtime);
        assert_eq!(commands[0].arg.as_deref(), Some("who is tim cook?"));
    }

    #[test]
    fn test_fallback_general() {
        let commands = parse_commands("", "hello there");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].verb, Verb::General);
        assert_eq!(commands[0].arg.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_never_empty_and_vocabulary_closed() {
        for (response, utterance) in [
            ("system time", "what time is it"),
            ("???", "tell me a joke"),
            ("open chrome and open notepad and play jazz", "u"),
            ("", ""),
        ] {
            let commands = parse_commands(response, utterance);
            assert!(!commands.is_empty());
            for command in &commands {
                assert!(Verb::ALL.contains(&command.verb));
            }
        }
    }

    #[test]
    fn test_response_casing_normalized() {
        let commands = parse_commands("Open Chrome AND Open Notepad", "irrelevant");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::new(Verb::Open, "chrome"));
        assert_eq!(commands[1], Command::new(Verb::Open, "notepad"));
    }

    #[test]
    fn test_has_proper_noun_skips_sentence_start() {
        assert!(has_proper_noun("Who is Tim Cook?"));
        assert!(has_proper_noun("tell me about Apple"));
        assert!(!has_proper_noun("Hello there"));
        assert!(!has_proper_noun("what time is it"));
        // Capitalized right after a sentence break is a new sentence start.
        assert!(!has_proper_noun("ok. Tell me more"));
    }
}
