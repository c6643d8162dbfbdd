pub mod assistant;
pub mod config;
pub mod repl;
pub mod responder;

pub use assistant::{Assistant, SessionOutcome, FAREWELL};
pub use config::Config;
pub use repl::Repl;
pub use responder::{
    ConversationalResponder, RetrievalResponder, APOLOGY_MESSAGE, QUOTA_LIMIT_MESSAGE,
};
