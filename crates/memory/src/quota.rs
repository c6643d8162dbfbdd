use crate::history::MemoryError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_MONTHLY_CAP: u32 = 100;

/// Persisted search-call counter for one billing month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub period: String,
    pub count: u32,
}

impl QuotaState {
    fn fresh(period: &str) -> Self {
        Self {
            period: period.to_string(),
            count: 0,
        }
    }
}

/// Enforces the monthly cap on external search calls. Count resets when the
/// period key rolls over. Read-modify-write per attempt; not safe against a
/// second process mutating the same file.
pub struct QuotaTracker {
    path: PathBuf,
    cap: u32,
}

impl QuotaTracker {
    pub fn new<P: AsRef<Path>>(path: P, cap: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cap,
        }
    }

    fn current_period() -> String {
        Local::now().format("%Y-%m").to_string()
    }

    /// Consume one search attempt for the current month.
    pub async fn try_consume(&self) -> Result<bool, MemoryError> {
        self.try_consume_in(&Self::current_period()).await
    }

    /// Period-injected variant; `try_consume` delegates here with the
    /// current month so rollover behavior stays testable.
    pub async fn try_consume_in(&self, period: &str) -> Result<bool, MemoryError> {
        let mut state = self.load(period).await;

        if state.period != period {
            tracing::info!("quota period rollover: {} -> {}", state.period, period);
            state = QuotaState::fresh(period);
        }

        if state.count >= self.cap {
            tracing::debug!("search quota exhausted for {}", period);
            return Ok(false);
        }

        state.count += 1;
        self.save(&state).await?;
        Ok(true)
    }

    async fn load(&self, period: &str) -> QuotaState {
        if !self.path.exists() {
            return QuotaState::fresh(period);
        }

        match fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("quota file corrupt, resetting: {}", e);
                QuotaState::fresh(period)
            }),
            Err(e) => {
                tracing::warn!("quota file unreadable, resetting: {}", e);
                QuotaState::fresh(period)
            }
        }
    }

    async fn save(&self, state: &QuotaState) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(state)?).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cap_then_denial() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = QuotaTracker::new(dir.path().join("quota.json"), 3);

        for _ in 0..3 {
            assert!(tracker.try_consume_in("2026-08").await.unwrap());
        }
        assert!(!tracker.try_consume_in("2026-08").await.unwrap());
        assert!(!tracker.try_consume_in("2026-08").await.unwrap());
    }

    #[tokio::test]
    async fn test_month_rollover_resets() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = QuotaTracker::new(dir.path().join("quota.json"), 2);

        assert!(tracker.try_consume_in("2026-08").await.unwrap());
        assert!(tracker.try_consume_in("2026-08").await.unwrap());
        assert!(!tracker.try_consume_in("2026-08").await.unwrap());

        // New month, same cap+1 pattern repeats.
        assert!(tracker.try_consume_in("2026-09").await.unwrap());
        assert!(tracker.try_consume_in("2026-09").await.unwrap());
        assert!(!tracker.try_consume_in("2026-09").await.unwrap());
    }

    #[tokio::test]
    async fn test_denial_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quota.json");
        let tracker = QuotaTracker::new(&path, 1);

        assert!(tracker.try_consume_in("2026-08").await.unwrap());
        let persisted = tokio::fs::read_to_string(&path).await.unwrap();

        assert!(!tracker.try_consume_in("2026-08").await.unwrap());
        let after_denial = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(persisted, after_denial);
    }

    #[tokio::test]
    async fn test_corrupt_state_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quota.json");
        tokio::fs::write(&path, "][").await.unwrap();

        let tracker = QuotaTracker::new(&path, 2);
        assert!(tracker.try_consume_in("2026-08").await.unwrap());

        let state: QuotaState =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(state, QuotaState { period: "2026-08".to_string(), count: 1 });
    }
}
