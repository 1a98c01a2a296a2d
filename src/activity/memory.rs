//! In-memory activity log, used when no log file is configured.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use super::{ActivityEntry, EventLog, EventLogError, MAX_ENTRIES};

#[derive(Default)]
pub struct MemoryLog {
    entries: RwLock<VecDeque<ActivityEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl EventLog for MemoryLog {
    async fn record_event(&self, entry: ActivityEntry) -> Result<(), EventLogError> {
        let mut entries = self.entries.write().await;
        entries.push_back(entry);
        while entries.len() > MAX_ENTRIES {
            entries.pop_front();
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, EventLogError> {
        let entries = self.entries.read().await;
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.iter().skip(skip).cloned().collect())
    }
}
