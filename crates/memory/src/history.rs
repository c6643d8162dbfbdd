use aria_core::ConversationTurn;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable, append-only conversation log backed by a pretty-printed JSON
/// file. The store is the sole mutation path for history.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Missing or unreadable files yield an empty history; corruption is
    /// overwritten on the next save.
    pub async fn load(&self) -> Result<Vec<ConversationTurn>, MemoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&content) {
            Ok(turns) => Ok(turns),
            Err(e) => {
                tracing::warn!("history file corrupt, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Full overwrite: write to a temp file, then rename.
    pub async fn save(&self, turns: &[ConversationTurn]) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(turns)?;

        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("saved {} history turns", turns.len());
        Ok(())
    }

    /// Append one user/assistant pair and persist before returning.
    pub async fn append_exchange(
        &self,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), MemoryError> {
        let mut turns = self.load().await?;
        turns.push(ConversationTurn::user(user_text));
        turns.push(ConversationTurn::assistant(assistant_text));
        self.save(&turns).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aria_core::Role;

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("chatlog.json"));

        let turns = vec![
            ConversationTurn::user("hello"),
            ConversationTurn::assistant("hi, how can I help?"),
        ];
        store.save(&turns).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, turns);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("absent.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty_and_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatlog.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = HistoryStore::new(&path);
        assert!(store.load().await.unwrap().is_empty());

        // Next save overwrites the corruption.
        store.save(&[ConversationTurn::user("hi")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_exchange_orders_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("chatlog.json"));

        store.append_exchange("q1", "a1").await.unwrap();
        store.append_exchange("q2", "a2").await.unwrap();

        let turns = store.load().await.unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[3].content, "a2");
    }
}
