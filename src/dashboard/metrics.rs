//! Derived dashboard metrics
//!
//! KPIs, the expiring-contract alert feed and the recent-activity rows.
//! Everything is recomputed from the full record set on each render.

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{PropertyRecord, Status};

/// KPI aggregate over a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_units: usize,
    pub occupied: usize,
    pub profit: f64,
    /// Contracts ending within the configured horizon
    pub expiring: usize,
    pub overdue: usize,
    pub maintenance: usize,
}

impl Kpis {
    /// Compute KPIs; overdue/maintenance are zero unless the API supplied them
    pub fn compute(
        records: &[PropertyRecord],
        today: NaiveDate,
        horizon_days: i64,
        overdue: Option<usize>,
        maintenance: Option<usize>,
    ) -> Self {
        Self {
            total_units: records.len(),
            occupied: records.iter().filter(|r| r.is_occupied()).count(),
            profit: total_profit(records),
            expiring: records
                .iter()
                .filter(|r| r.expires_within(today, horizon_days))
                .count(),
            overdue: overdue.unwrap_or(0),
            maintenance: maintenance.unwrap_or(0),
        }
    }

    /// `"occupied / total"`, or `"0"` with no units
    pub fn occupancy_label(&self) -> String {
        if self.total_units == 0 {
            "0".to_string()
        } else {
            format!("{} / {}", self.occupied, self.total_units)
        }
    }
}

/// Sum of rent out minus rent in
pub fn total_profit(records: &[PropertyRecord]) -> f64 {
    records.iter().map(PropertyRecord::profit).sum()
}

/// A contract-expiring notice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub unit: String,
    pub days_left: i64,
}

/// First `limit` records, in record order, ending within `window` days
pub fn expiring_alerts(
    records: &[PropertyRecord],
    today: NaiveDate,
    window: i64,
    limit: usize,
) -> Vec<Alert> {
    records
        .iter()
        .filter_map(|r| {
            let days_left = r.days_left(today)?;
            (days_left > 0 && days_left <= window).then(|| Alert {
                unit: r.unit.clone(),
                days_left,
            })
        })
        .take(limit)
        .collect()
}

/// One recent-activity table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRow {
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: String,
    pub tenant: String,
    pub days_left: Option<i64>,
    pub rent_in: f64,
    pub rent_out: f64,
    pub profit: f64,
    pub status: Status,
}

impl RecentRow {
    fn from_record(record: &PropertyRecord, today: NaiveDate) -> Self {
        Self {
            unit: record.unit.clone(),
            kind: record.kind.clone(),
            owner: record.owner_name.clone(),
            tenant: record.tenant_name.clone(),
            days_left: record.days_left(today),
            rent_in: record.rent_in_monthly,
            rent_out: record.rent_out_monthly,
            profit: record.profit(),
            status: record.status(today),
        }
    }
}

/// The `limit` most recently created records, newest first
///
/// Unknown creation times sort as the epoch; ties keep input order.
pub fn recent_rows<'a, I>(records: I, today: NaiveDate, limit: usize) -> Vec<RecentRow>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut sorted: Vec<&PropertyRecord> = records.into_iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.created_millis()));

    sorted
        .into_iter()
        .take(limit)
        .map(|r| RecentRow::from_record(r, today))
        .collect()
}

/// Records matching a free-text query; a blank query matches everything
pub fn search<'a>(records: &'a [PropertyRecord], query: &str) -> Vec<&'a PropertyRecord> {
    let query = query.trim();
    if query.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| r.matches(query)).collect()
}
