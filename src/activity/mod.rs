//! Activity log for estimate interactions.
//!
//! Handlers depend on the [`EventLog`] capability rather than a concrete
//! store, so the estimate engine stays pure and tests can swap in
//! [`MemoryLog`]. Both stores keep only the newest [`MAX_ENTRIES`] records.

pub mod file;
pub mod memory;
pub mod routes;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub use file::JsonFileLog;
pub use memory::MemoryLog;
pub use routes::router;

/// Number of entries retained by every log store
pub const MAX_ENTRIES: usize = 200;

/// One timestamped record in the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub event: String,
    pub data: serde_json::Value,
}

impl ActivityEntry {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            event: event.into(),
            data,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("Activity log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Activity log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Capability for recording activity.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append an entry, dropping the oldest beyond [`MAX_ENTRIES`]
    async fn record_event(&self, entry: ActivityEntry) -> Result<(), EventLogError>;

    /// Up to `limit` most recent entries, oldest first
    async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, EventLogError>;
}

/// Record an entry without waiting for the store.
///
/// Failures are logged and swallowed; the caller's response never depends on
/// the log.
pub fn record_in_background(log: Arc<dyn EventLog>, entry: ActivityEntry) {
    tokio::spawn(async move {
        let event = entry.event.clone();
        if let Err(e) = log.record_event(entry).await {
            tracing::warn!(event = %event, error = %e, "Failed to record activity");
        }
    });
}

/// The last `limit` items of an oldest-first buffer
pub(crate) fn newest_window<T>(entries: &[T], limit: usize) -> &[T] {
    let start = entries.len().saturating_sub(limit);
    &entries[start..]
}
