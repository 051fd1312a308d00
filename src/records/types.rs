//! Core record types
//!
//! - `PropertyRecord`: one rental unit as stored locally or returned by the API
//! - `Status`: derived occupancy/contract state
//! - `Period`: a billing month
//! - `RentPayment`: a payment to post to the backend

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::coerce::{number_field, text_field};
use super::dates::{days_until, parse_date_time, timestamp_millis};

/// Days before contract end at which a lease counts as expiring
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

const UNIT_KEYS: &[&str] = &["unit", "Unit", "studioId", "StudioId", "studio_id", "id", "Id"];
const TYPE_KEYS: &[&str] = &["type", "Type", "unitType", "UnitType"];
const LOCATION_KEYS: &[&str] = &["location", "Location", "building", "Building"];
const OWNER_KEYS: &[&str] = &["ownerName", "OwnerName", "owner", "Owner"];
const TENANT_KEYS: &[&str] = &["tenantName", "TenantName", "tenant", "Tenant"];
const RENT_IN_KEYS: &[&str] = &["rentInMonthly", "RentInMonthly", "rentIn", "RentIn", "OwnerRent"];
const RENT_OUT_KEYS: &[&str] = &[
    "rentOutMonthly",
    "RentOutMonthly",
    "rentOut",
    "RentOut",
    "Rent",
    "MonthlyRent",
];
const CONTRACT_END_KEYS: &[&str] = &[
    "tenantContractTo",
    "TenantContractTo",
    "contractEnd",
    "ContractEnd",
    "ContractTo",
];
const CREATED_KEYS: &[&str] = &["createdAtUtc", "CreatedAtUtc", "createdAt", "CreatedAt", "Created"];

/// A single rental unit
///
/// Read-only from the dashboard's point of view. Deserializes from the
/// camelCase schema of the local store or from API rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    pub unit: String,
    pub kind: String,
    pub location: String,
    pub owner_name: String,
    pub tenant_name: String,
    pub rent_in_monthly: f64,
    pub rent_out_monthly: f64,
    /// Raw contract end date, parsed on demand
    pub tenant_contract_to: Option<String>,
    /// Raw creation timestamp, parsed on demand
    pub created_at_utc: Option<String>,
}

impl PropertyRecord {
    /// Create a record for a unit, everything else empty
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..Self::default()
        }
    }

    /// Builder method: set the tenant
    pub fn tenant(mut self, name: impl Into<String>) -> Self {
        self.tenant_name = name.into();
        self
    }

    /// Builder method: set the owner
    pub fn owner(mut self, name: impl Into<String>) -> Self {
        self.owner_name = name.into();
        self
    }

    /// Builder method: set monthly rent in (to owner) and out (from tenant)
    pub fn rents(mut self, rent_in: f64, rent_out: f64) -> Self {
        self.rent_in_monthly = rent_in;
        self.rent_out_monthly = rent_out;
        self
    }

    /// Builder method: set the contract end date
    pub fn contract_to(mut self, date: impl Into<String>) -> Self {
        self.tenant_contract_to = Some(date.into());
        self
    }

    /// Builder method: set the creation timestamp
    pub fn created_at(mut self, timestamp: impl Into<String>) -> Self {
        self.created_at_utc = Some(timestamp.into());
        self
    }

    /// Read a record from a JSON object, trying known aliases per field
    ///
    /// Returns `None` for anything that is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let optional = |keys: &[&str]| Some(text_field(object, keys)).filter(|s| !s.is_empty());

        Some(Self {
            unit: text_field(object, UNIT_KEYS),
            kind: text_field(object, TYPE_KEYS),
            location: text_field(object, LOCATION_KEYS),
            owner_name: text_field(object, OWNER_KEYS),
            tenant_name: text_field(object, TENANT_KEYS),
            rent_in_monthly: number_field(object, RENT_IN_KEYS),
            rent_out_monthly: number_field(object, RENT_OUT_KEYS),
            tenant_contract_to: optional(CONTRACT_END_KEYS),
            created_at_utc: optional(CREATED_KEYS),
        })
    }

    /// Whether someone is renting the unit
    pub fn is_occupied(&self) -> bool {
        !self.tenant_name.trim().is_empty()
    }

    /// Signed days until the contract ends, `None` without a usable date
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        let end = parse_date_time(self.tenant_contract_to.as_deref()?)?;
        Some(days_until(end, today))
    }

    /// Contract expires within `window` days (exclusive of today)
    pub fn expires_within(&self, today: NaiveDate, window: i64) -> bool {
        matches!(self.days_left(today), Some(d) if d > 0 && d <= window)
    }

    /// Derived status
    pub fn status(&self, today: NaiveDate) -> Status {
        if !self.is_occupied() {
            return Status::Vacant;
        }
        match self.days_left(today) {
            None => Status::Active,
            Some(d) if d <= 0 => Status::Expired,
            Some(d) if d <= EXPIRING_WINDOW_DAYS => Status::Expiring,
            Some(_) => Status::Active,
        }
    }

    /// Monthly profit: rent out minus rent in
    pub fn profit(&self) -> f64 {
        self.rent_out_monthly - self.rent_in_monthly
    }

    /// Creation time in epoch millis, 0 when unknown
    pub fn created_millis(&self) -> i64 {
        timestamp_millis(self.created_at_utc.as_deref())
    }

    /// Case-insensitive substring match across the searchable text fields
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            &self.unit,
            &self.kind,
            &self.location,
            &self.owner_name,
            &self.tenant_name,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .any(|s| s.to_lowercase().contains(&needle))
    }
}

impl<'de> Deserialize<'de> for PropertyRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        PropertyRecord::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom("property record must be a JSON object"))
    }
}

/// Read every object in a row set as a record, skipping anything else
pub fn records_from_rows(rows: &[Value]) -> Vec<PropertyRecord> {
    rows.iter().filter_map(PropertyRecord::from_json).collect()
}

/// Derived state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Vacant,
    Expired,
    Expiring,
    Active,
}

impl Status {
    /// Badge style name used by the renderers
    pub fn badge(&self) -> &'static str {
        match self {
            Status::Vacant => "vacant",
            Status::Expired => "expired",
            Status::Expiring => "expiring",
            Status::Active => "active",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Vacant => "Vacant",
            Status::Expired => "Expired",
            Status::Expiring => "Expiring",
            Status::Active => "Active",
        };
        f.write_str(label)
    }
}

/// A billing month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// The period containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// English month name, e.g. "March"
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// Human-readable label, e.g. "March 2026"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("Invalid month {0}: expected 1-12")]
    InvalidMonth(u32),
}

/// A rent payment to record against a studio
#[derive(Debug, Clone, PartialEq)]
pub struct RentPayment {
    pub studio_id: String,
    pub period: Period,
    pub payment_date: NaiveDate,
    pub amount: f64,
    pub maintenance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn ending_in(days: i64) -> PropertyRecord {
        let end = today() + Duration::days(days);
        PropertyRecord::new("A-1")
            .tenant("Omar")
            .contract_to(end.format("%Y-%m-%d").to_string())
    }

    #[test]
    fn test_vacant_regardless_of_contract() {
        let record = PropertyRecord::new("A-1").contract_to("2026-10-20");
        assert_eq!(record.status(today()), Status::Vacant);

        let blank = PropertyRecord::new("A-2").tenant("   ").contract_to("2020-01-01");
        assert_eq!(blank.status(today()), Status::Vacant);
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(ending_in(30).status(today()), Status::Expiring);
        assert_eq!(ending_in(31).status(today()), Status::Active);
        assert_eq!(ending_in(1).status(today()), Status::Expiring);
        assert_eq!(ending_in(0).status(today()), Status::Expired);
        assert_eq!(ending_in(-5).status(today()), Status::Expired);
    }

    #[test]
    fn test_tenant_without_contract_is_active() {
        let record = PropertyRecord::new("A-1").tenant("Omar");
        assert_eq!(record.days_left(today()), None);
        assert_eq!(record.status(today()), Status::Active);

        let bad_date = PropertyRecord::new("A-1").tenant("Omar").contract_to("next year");
        assert_eq!(bad_date.status(today()), Status::Active);
    }

    #[test]
    fn test_profit_exact() {
        assert_eq!(PropertyRecord::new("x").rents(5000.0, 6200.0).profit(), 1200.0);
        assert_eq!(PropertyRecord::new("x").rents(6200.0, 5000.0).profit(), -1200.0);
        assert_eq!(PropertyRecord::new("x").rents(4000.0, 4000.0).profit(), 0.0);
    }

    #[test]
    fn test_from_local_schema() {
        let value = json!({
            "unit": "Z-26",
            "type": "Studio",
            "location": "Al Nahda",
            "ownerName": "Sabir",
            "tenantName": "Omar",
            "rentInMonthly": "AED 3,000",
            "rentOutMonthly": 3600,
            "tenantContractTo": "2027-01-31",
            "createdAtUtc": "2026-01-01T08:00:00Z"
        });

        let record = PropertyRecord::from_json(&value).unwrap();
        assert_eq!(record.unit, "Z-26");
        assert_eq!(record.kind, "Studio");
        assert_eq!(record.rent_in_monthly, 3000.0);
        assert_eq!(record.profit(), 600.0);
        assert_eq!(record.tenant_contract_to.as_deref(), Some("2027-01-31"));
    }

    #[test]
    fn test_from_spreadsheet_aliases() {
        let value = json!({"StudioId": "z26", "Tenant": "Huda", "Rent": "1,800", "ContractEnd": ""});
        let record = PropertyRecord::from_json(&value).unwrap();
        assert_eq!(record.unit, "z26");
        assert_eq!(record.tenant_name, "Huda");
        assert_eq!(record.rent_out_monthly, 1800.0);
        assert_eq!(record.tenant_contract_to, None);
    }

    #[test]
    fn test_rows_skip_non_objects() {
        let rows = vec![json!({"unit": "A"}), json!(5), json!(null), json!({"unit": "B"})];
        let records = records_from_rows(&rows);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_search_match() {
        let record = PropertyRecord::new("B-204").tenant("Fatima").owner("Sabir");
        assert!(record.matches("fatima"));
        assert!(record.matches("b-2"));
        assert!(!record.matches("marina"));
    }

    #[test]
    fn test_period() {
        let period = Period::new(3, 2026).unwrap();
        assert_eq!(period.month_name(), "March");
        assert_eq!(period.label(), "March 2026");
        assert_eq!(period.to_string(), "2026-03");
        assert_eq!(Period::new(13, 2026), Err(PeriodError::InvalidMonth(13)));
        assert_eq!(Period::containing(today()).month(), 10);
    }
}
