//! Shared test utilities for the command, conversation, and gateway tests.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use teletask_core::config::StoreConfig;
use teletask_store::Store;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a temporary on-disk store for testing (unique per call).
pub async fn test_store() -> Store {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "__teletask_test_{}_{}__",
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_dir_all(&dir);
    let config = StoreConfig {
        db_path: dir.join("tasks.db").to_string_lossy().to_string(),
    };
    Store::new(&config).await.unwrap()
}

/// Fixed timestamp so assertions on stored times are stable.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}
