//! JSON file activity log.
//!
//! The whole log is a single JSON array rewritten on every append. Each
//! rewrite goes to a sibling temp file that is renamed over the log, so
//! readers and crashes never see a partial array. A missing or unreadable
//! file is treated as an empty log.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{newest_window, ActivityEntry, EventLog, EventLogError, MAX_ENTRIES};

pub struct JsonFileLog {
    path: PathBuf,
    // Serializes read-modify-write cycles and reads within this process
    lock: Mutex<()>,
}

impl JsonFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "activity-log".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<Vec<ActivityEntry>, EventLogError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<ActivityEntry>>(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Activity log unreadable, starting over");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl EventLog for JsonFileLog {
    async fn record_event(&self, entry: ActivityEntry) -> Result<(), EventLogError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.load().await?;
        entries.push(entry);
        let kept = newest_window(&entries, MAX_ENTRIES);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(kept)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), entries = kept.len(), "Activity recorded");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, EventLogError> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;
        Ok(newest_window(&entries, limit).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn temp_path() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("estimate_web_log_{}", uuid::Uuid::new_v4()));
        p.push("activity.json");
        p
    }

    async fn cleanup(log: &JsonFileLog) {
        if let Some(dir) = log.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn test_record_creates_file_and_parent_dir() {
        let log = JsonFileLog::new(temp_path());
        log.record_event(ActivityEntry::new("estimate", json!({"price": 75})))
            .await
            .unwrap();

        assert!(log.path().exists());
        let entries = log.recent(10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "estimate");
        assert_eq!(entries[0].data["price"], 75);

        cleanup(&log).await;
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let log = JsonFileLog::new(temp_path());
        assert!(log.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_over() {
        let log = JsonFileLog::new(temp_path());
        tokio::fs::create_dir_all(log.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(log.path(), b"{not json").await.unwrap();

        assert!(log.recent(10).await.unwrap().is_empty());
        log.record_event(ActivityEntry::new("client", json!(null))).await.unwrap();
        assert_eq!(log.recent(10).await.unwrap().len(), 1);

        cleanup(&log).await;
    }

    #[tokio::test]
    async fn test_keeps_newest_entries_only() {
        let log = JsonFileLog::new(temp_path());
        for i in 0..(MAX_ENTRIES + 5) {
            log.record_event(ActivityEntry::new("estimate", json!({ "n": i })))
                .await
                .unwrap();
        }

        let entries = log.recent(usize::MAX).await.unwrap();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].data["n"], 5);
        assert_eq!(entries[MAX_ENTRIES - 1].data["n"], MAX_ENTRIES + 4);

        let last_two = log.recent(2).await.unwrap();
        assert_eq!(last_two[1].data["n"], MAX_ENTRIES + 4);

        cleanup(&log).await;
    }

    #[tokio::test]
    async fn test_temp_path_is_sibling() {
        let log = JsonFileLog::new("/var/lib/estimates/activity.json");
        assert_eq!(log.temp_path(), PathBuf::from("/var/lib/estimates/activity.json.tmp"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let log = JsonFileLog::new(temp_path());
        log.record_event(ActivityEntry::new("estimate", json!({}))).await.unwrap();

        assert!(log.path().exists());
        assert!(!log.temp_path().exists());

        cleanup(&log).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reads_during_writes_see_full_log() {
        let log = Arc::new(JsonFileLog::new(temp_path()));
        for i in 0..MAX_ENTRIES {
            log.record_event(ActivityEntry::new("estimate", json!({ "n": i })))
                .await
                .unwrap();
        }

        let writer = {
            let log = log.clone();
            tokio::spawn(async move {
                for i in 0..MAX_ENTRIES {
                    log.record_event(ActivityEntry::new("estimate", json!({ "n": MAX_ENTRIES + i })))
                        .await
                        .unwrap();
                }
            })
        };

        let mut short_reads = 0;
        while !writer.is_finished() {
            if log.recent(MAX_ENTRIES).await.unwrap().len() != MAX_ENTRIES {
                short_reads += 1;
            }
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert_eq!(short_reads, 0);
        let entries = log.recent(MAX_ENTRIES).await.unwrap();
        assert_eq!(entries[MAX_ENTRIES - 1].data["n"], 2 * MAX_ENTRIES - 1);

        cleanup(&log).await;
    }
}
