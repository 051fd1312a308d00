//! Local store source

use super::*;
use crate::store::LocalStore;

/// Records from the local store; overdue and maintenance are not tracked
pub struct LocalSource {
    store: LocalStore,
}

impl LocalSource {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecordSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self) -> Result<Snapshot, SourceError> {
        let records = self.store.load()?;
        tracing::debug!(count = records.len(), path = ?self.store.path(), "loaded local records");
        Ok(Snapshot::local(self.name(), records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_snapshot_has_no_api_counters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("props.json");
        std::fs::write(&path, r#"[{"unit": "A-1", "tenantName": "Omar"}]"#).unwrap();

        let snapshot = LocalSource::new(LocalStore::new(&path)).load().await.unwrap();
        assert_eq!(snapshot.source, "local");
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.overdue, None);
        assert_eq!(snapshot.maintenance, None);
    }
}
