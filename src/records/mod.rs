//! Property records and derived metrics
//!
//! ## Modules
//!
//! - `types`: `PropertyRecord`, `Status`, `Period`, `RentPayment`
//! - `coerce`: lenient number/text coercion for spreadsheet cells
//! - `dates`: date parsing and day arithmetic

pub mod coerce;
pub mod dates;
mod types;

pub use types::{
    records_from_rows, Period, PeriodError, PropertyRecord, RentPayment, Status,
    EXPIRING_WINDOW_DAYS,
};
