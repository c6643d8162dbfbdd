pub mod classifier;
pub mod context;
pub mod parser;
pub mod router;
pub mod types;

pub use classifier::IntentClassifier;
pub use context::{format_search_results, ContextBuilder};
pub use router::{route, ResponderKind, RouteOutcome, GREETING_REPLY};
pub use types::*;
