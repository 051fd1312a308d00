//! Spreadsheet API source
//!
//! Studios become property records; the current month's rent records
//! supply the overdue and maintenance counters.

use super::*;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::records::coerce::{number_field, text_field};
use crate::records::{records_from_rows, Period};

const STATUS_KEYS: &[&str] = &["status", "Status", "paymentStatus", "PaymentStatus"];
const MAINTENANCE_KEYS: &[&str] = &["maintenance", "Maintenance", "maintenanceFee", "MaintenanceFee"];

/// Records from the spreadsheet API
pub struct ApiSource {
    client: Arc<ApiClient>,
    today: NaiveDate,
}

impl ApiSource {
    pub fn new(client: Arc<ApiClient>, today: NaiveDate) -> Self {
        Self { client, today }
    }
}

#[async_trait]
impl RecordSource for ApiSource {
    fn name(&self) -> &str {
        "api"
    }

    async fn load(&self) -> Result<Snapshot, SourceError> {
        let studios = self.client.get_studios().await?;
        let rent_rows = self
            .client
            .get_rent_records(Period::containing(self.today))
            .await?;

        let (overdue, maintenance) = rent_counters(&rent_rows);
        tracing::debug!(
            studios = studios.len(),
            rent_rows = rent_rows.len(),
            overdue,
            maintenance,
            "loaded API records"
        );

        Ok(Snapshot {
            source: self.name().to_string(),
            records: records_from_rows(&studios),
            overdue: Some(overdue),
            maintenance: Some(maintenance),
        })
    }
}

/// Count overdue rows and rows with a positive maintenance fee
pub fn rent_counters(rows: &[Value]) -> (usize, usize) {
    let objects = || rows.iter().filter_map(Value::as_object);

    let overdue = objects()
        .filter(|row| text_field(row, STATUS_KEYS).eq_ignore_ascii_case("overdue"))
        .count();
    let maintenance = objects()
        .filter(|row| number_field(row, MAINTENANCE_KEYS) > 0.0)
        .count();

    (overdue, maintenance)
}
