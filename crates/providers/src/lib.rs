pub mod openai_compatible;
pub mod search;
pub mod traits;

pub use openai_compatible::OpenAICompatibleBackend;
pub use search::SerpSearchBackend;
pub use traits::*;
