use serde::{Deserialize, Serialize};

/// Closed vocabulary of command verbs the classifier may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    System,
    Open,
    Close,
    Play,
    Reminder,
    GenerateImage,
    Content,
    YoutubeSearch,
    GoogleSearch,
    Realtime,
    General,
    Exit,
}

impl Verb {
    pub const ALL: [Verb; 12] = [
        Verb::System,
        Verb::Open,
        Verb::Close,
        Verb::Play,
        Verb::Reminder,
        Verb::GenerateImage,
        Verb::Content,
        Verb::YoutubeSearch,
        Verb::GoogleSearch,
        Verb::Realtime,
        Verb::General,
        Verb::Exit,
    ];

    /// Spoken surface form, as it appears in classifier output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::System => "system",
            Verb::Open => "open",
            Verb::Close => "close",
            Verb::Play => "play",
            Verb::Reminder => "reminder",
            Verb::GenerateImage => "generate image",
            Verb::Content => "content",
            Verb::YoutubeSearch => "youtube search",
            Verb::GoogleSearch => "google search",
            Verb::Realtime => "realtime",
            Verb::General => "general",
            Verb::Exit => "exit",
        }
    }

    /// Match a verb at the start of a lowercased fragment, on a word
    /// boundary. Longer surface forms win so "generate image" is never
    /// shadowed by a shorter verb. Returns the verb and the remainder.
    pub fn match_prefix(fragment: &str) -> Option<(Verb, &str)> {
        let mut candidates: Vec<Verb> = Verb::ALL.to_vec();
        candidates.sort_by_key(|v| std::cmp::Reverse(v.as_str().len()));

        for verb in candidates {
            let surface = verb.as_str();
            if let Some(rest) = fragment.strip_prefix(surface) {
                if rest.is_empty() {
                    return Some((verb, rest));
                }
                if rest.starts_with(char::is_whitespace) {
                    return Some((verb, rest.trim_start()));
                }
            }
        }

        None
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized (verb, argument) pair derived from one utterance fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub verb: Verb,
    pub arg: Option<String>,
}

impl Command {
    pub fn new(verb: Verb, arg: &str) -> Self {
        let arg = arg.trim();
        Self {
            verb,
            arg: if arg.is_empty() {
                None
            } else {
                Some(arg.to_string())
            },
        }
    }

    pub fn bare(verb: Verb) -> Self {
        Self { verb, arg: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One persisted turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
