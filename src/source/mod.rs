//! Record Sources
//!
//! Where the dashboard gets its property records from:
//! - the spreadsheet API (studios plus this month's rent records)
//! - the local record store
//!
//! [`load_with_fallback`] prefers the API and drops back to the local
//! store when the API is missing or fails. The two copies are never
//! reconciled.

mod api;
mod local;

pub use api::ApiSource;
pub use local::LocalSource;

use async_trait::async_trait;

use crate::client::ClientError;
use crate::records::PropertyRecord;
use crate::store::StoreError;

/// Common trait for all record sources
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name shown on the dashboard
    fn name(&self) -> &str;

    /// Load a full snapshot
    async fn load(&self) -> Result<Snapshot, SourceError>;
}

/// Records plus the counters only the API tracks
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub source: String,
    pub records: Vec<PropertyRecord>,
    /// Rent records marked overdue this month; `None` when not tracked
    pub overdue: Option<usize>,
    /// Rent records carrying a maintenance fee this month; `None` when not tracked
    pub maintenance: Option<usize>,
}

impl Snapshot {
    /// Snapshot without API-only counters
    pub fn local(source: impl Into<String>, records: Vec<PropertyRecord>) -> Self {
        Self {
            source: source.into(),
            records,
            overdue: None,
            maintenance: None,
        }
    }
}

/// Errors that can occur loading records
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    #[error("Local store error: {0}")]
    Store(#[from] StoreError),
}

/// Load from `primary` if given, falling back to `fallback` on any error
pub async fn load_with_fallback(
    primary: Option<&dyn RecordSource>,
    fallback: &dyn RecordSource,
) -> Result<Snapshot, SourceError> {
    if let Some(primary) = primary {
        match primary.load().await {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => {
                tracing::warn!(
                    source = primary.name(),
                    error = %e,
                    "falling back to {}",
                    fallback.name()
                );
            }
        }
    }

    fallback.load().await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<usize, ()>);

    #[async_trait]
    impl RecordSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn load(&self) -> Result<Snapshot, SourceError> {
            match self.0 {
                Ok(n) => Ok(Snapshot::local(
                    "fixed",
                    (0..n).map(|i| PropertyRecord::new(format!("U-{}", i))).collect(),
                )),
                Err(()) => Err(SourceError::Client(ClientError::MissingUrl)),
            }
        }
    }

    #[tokio::test]
    async fn test_primary_wins() {
        let primary = Fixed(Ok(2));
        let fallback = Fixed(Ok(5));
        let snapshot = load_with_fallback(Some(&primary), &fallback).await.unwrap();
        assert_eq!(snapshot.records.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_primary_uses_fallback() {
        let primary = Fixed(Err(()));
        let fallback = Fixed(Ok(5));
        let snapshot = load_with_fallback(Some(&primary), &fallback).await.unwrap();
        assert_eq!(snapshot.records.len(), 5);
    }

    #[tokio::test]
    async fn test_no_primary() {
        let fallback = Fixed(Ok(1));
        let snapshot = load_with_fallback(None, &fallback).await.unwrap();
        assert_eq!(snapshot.records.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_error_propagates() {
        let fallback = Fixed(Err(()));
        assert!(load_with_fallback(None, &fallback).await.is_err());
    }
}
