pub mod history;
pub mod quota;

pub use history::{HistoryStore, MemoryError};
pub use quota::{QuotaState, QuotaTracker};
