//! # Rentboard
//!
//! Rent-tracking dashboard for a small real-estate operation. Property
//! records come from a spreadsheet-backed web app (Google Apps Script) or
//! from a local JSON copy; the dashboard derives occupancy, profit,
//! expiring contracts and trends from them.
//!
//! ## Modules
//!
//! - [`client`]: HTTP client for the spreadsheet API with POST→GET fallback
//! - [`records`]: property records, lenient coercion, derived status
//! - [`store`]: read-only local record store
//! - [`source`]: API and local record sources with fallback
//! - [`dashboard`]: KPIs, alerts, recent activity and charts
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rentboard::client::{ApiClient, ClientConfig};
//! use rentboard::Period;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::with_url(
//!         "https://script.google.com/macros/s/<deployment-id>/exec",
//!     ))?;
//!
//!     let studios = client.get_studios().await?;
//!     let march = client.get_rent_records(Period::new(3, 2026)?).await?;
//!
//!     println!("{} studios, {} rent records in March", studios.len(), march.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod records;
pub mod source;
pub mod store;

// Re-export top-level types for convenience
pub use client::{ApiClient, ClientConfig, ClientError, ClientResult, ErrorKind, Params};

pub use records::{Period, PeriodError, PropertyRecord, RentPayment, Status};

pub use store::{LocalStore, StoreError};

pub use source::{load_with_fallback, ApiSource, LocalSource, RecordSource, Snapshot, SourceError};

pub use dashboard::{ChartRange, Dashboard, DashboardOptions, DashboardView, TerminalCharts};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig, Resolved};
