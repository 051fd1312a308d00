//! Dashboard Renderer
//!
//! Turns a record snapshot into KPIs, an alert feed, a searchable
//! recent-activity table and two charts.
//!
//! # Example
//!
//! ```rust,no_run
//! use rentboard::dashboard::{ChartRange, Dashboard, DashboardOptions, TerminalCharts};
//! use rentboard::source::Snapshot;
//! use rentboard::PropertyRecord;
//!
//! let snapshot = Snapshot::local(
//!     "local",
//!     vec![PropertyRecord::new("A-101").tenant("Omar").rents(3000.0, 3600.0)],
//! );
//! let today = chrono::Local::now().date_naive();
//! let dashboard = Dashboard::new(snapshot, DashboardOptions::default(), today);
//!
//! let view = dashboard.view(ChartRange::TwelveMonths, None);
//! print!("{}", view.render_text(Some(&TerminalCharts::default())));
//! ```

pub mod charts;
pub mod format;
pub mod metrics;
pub mod view;

pub use charts::{breakdown, profit_trend, Breakdown, ChartRange, ChartSurface, Series, TerminalCharts};
pub use metrics::{expiring_alerts, recent_rows, search, total_profit, Alert, Kpis, RecentRow};
pub use view::{AlertItem, DashboardView, KpiPanel, TableRow};

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::records::PropertyRecord;
use crate::source::Snapshot;

/// Rendering options
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub currency: String,
    pub expiring_horizon_days: i64,
    pub alert_window_days: i64,
    pub alert_limit: usize,
    pub recent_limit: usize,
    pub sheet_url: Option<String>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for DashboardOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            expiring_horizon_days: config.expiring_horizon_days,
            alert_window_days: config.alert_window_days,
            alert_limit: config.alert_limit,
            recent_limit: config.recent_limit,
            sheet_url: None,
        }
    }
}

/// A loaded dashboard
///
/// Holds the snapshot it was built from; searching and switching the chart
/// range re-derive from it without reloading.
pub struct Dashboard {
    snapshot: Snapshot,
    options: DashboardOptions,
    today: NaiveDate,
}

impl Dashboard {
    pub fn new(snapshot: Snapshot, options: DashboardOptions, today: NaiveDate) -> Self {
        Self {
            snapshot,
            options,
            today,
        }
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.snapshot.records
    }

    pub fn kpis(&self) -> Kpis {
        Kpis::compute(
            self.records(),
            self.today,
            self.options.expiring_horizon_days,
            self.snapshot.overdue,
            self.snapshot.maintenance,
        )
    }

    pub fn alerts(&self) -> Vec<Alert> {
        expiring_alerts(
            self.records(),
            self.today,
            self.options.alert_window_days,
            self.options.alert_limit,
        )
    }

    /// Recent rows, optionally filtered by a search query
    pub fn recent(&self, query: Option<&str>) -> Vec<RecentRow> {
        let matching = search(self.records(), query.unwrap_or_default());
        recent_rows(matching, self.today, self.options.recent_limit)
    }

    pub fn trend(&self, range: ChartRange) -> Series {
        profit_trend(self.records(), self.today, range)
    }

    pub fn breakdown(&self) -> Breakdown {
        breakdown(self.records())
    }

    /// Build the full view
    pub fn view(&self, range: ChartRange, query: Option<&str>) -> DashboardView {
        let currency = &self.options.currency;
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        DashboardView {
            now: format::now_line(self.today),
            source: self.snapshot.source.clone(),
            sheet_url: self.options.sheet_url.clone(),
            currency: currency.clone(),
            kpis: KpiPanel::new(&self.kpis(), currency),
            alerts: AlertItem::feed(&self.alerts(), self.options.alert_window_days),
            recent: self
                .recent(query)
                .iter()
                .map(|r| TableRow::new(r, currency))
                .collect(),
            search: query.map(str::to_string),
            range,
            trend: self.trend(range),
            breakdown: self.breakdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn dashboard() -> Dashboard {
        let in_days = |d| (today() + Duration::days(d)).format("%Y-%m-%d").to_string();
        let records = vec![
            PropertyRecord::new("A-101")
                .tenant("Omar")
                .owner("Sabir")
                .rents(3000.0, 3600.0)
                .contract_to(in_days(10))
                .created_at("2026-01-05"),
            PropertyRecord::new("A-102").owner("Sabir").created_at("2026-03-01"),
            PropertyRecord::new("B-201")
                .tenant("Huda")
                .owner("Karim")
                .rents(4000.0, 4800.0)
                .contract_to(in_days(400))
                .created_at("2026-02-10"),
        ];
        Dashboard::new(
            Snapshot::local("local", records),
            DashboardOptions::default(),
            today(),
        )
    }

    #[test]
    fn test_view_scenario() {
        let view = dashboard().view(ChartRange::TwelveMonths, None);
        assert_eq!(view.kpis.occupied, "2 / 3");
        assert_eq!(view.kpis.profit, "AED 1,400.00");
        assert_eq!(view.kpis.overdue, "0");
        assert_eq!(view.alerts.len(), 1);
        assert_eq!(view.alerts[0].detail, "A-101 • 10 days left");
        let units: Vec<_> = view.recent.iter().map(|r| r.unit.as_str()).collect();
        assert_eq!(units, vec!["A-102", "B-201", "A-101"]);
        assert_eq!(view.trend.labels.len(), 12);
    }

    #[test]
    fn test_search_filters_table_only() {
        let dash = dashboard();
        let view = dash.view(ChartRange::SixMonths, Some("KARIM"));
        assert_eq!(view.recent.len(), 1);
        assert_eq!(view.recent[0].unit, "B-201");
        assert_eq!(view.kpis.total_units, "3");
        assert_eq!(view.search.as_deref(), Some("KARIM"));

        let view = dash.view(ChartRange::SixMonths, Some("   "));
        assert_eq!(view.recent.len(), 3);
        assert!(view.search.is_none());
    }

    #[test]
    fn test_render_text_without_charts() {
        let view = dashboard().view(ChartRange::SixMonths, None);
        let text = view.render_text(None);
        assert!(text.contains("Occupied      2 / 3"));
        assert!(text.contains("Contract expiring soon"));
        assert!(!text.contains("Profit trend"));

        let text = view.render_text(Some(&TerminalCharts::default()));
        assert!(text.contains("Profit trend (6m)"));
        assert!(text.contains("Income vs Expenses"));
    }

    #[test]
    fn test_empty_dashboard() {
        let dash = Dashboard::new(Snapshot::default(), DashboardOptions::default(), today());
        let view = dash.view(ChartRange::All, None);
        assert_eq!(view.kpis.occupied, "0");
        assert_eq!(view.alerts[0].title, "No urgent alerts");
        assert!(view.render_text(None).contains("No properties yet."));
    }
}
