//! Rendered dashboard view
//!
//! The view is plain data: the CLI prints it as text or serializes it as
//! JSON.

use serde::Serialize;
use std::fmt::Write;

use super::charts::{Breakdown, ChartRange, ChartSurface, Series};
use super::format::{money, or_dash, EMPTY};
use super::metrics::{Alert, Kpis, RecentRow};

/// KPI panel text
#[derive(Debug, Clone, Serialize)]
pub struct KpiPanel {
    pub total_units: String,
    pub occupied: String,
    pub profit: String,
    pub expiring: String,
    pub overdue: String,
    pub maintenance: String,
}

impl KpiPanel {
    pub fn new(kpis: &Kpis, currency: &str) -> Self {
        Self {
            total_units: kpis.total_units.to_string(),
            occupied: kpis.occupancy_label(),
            profit: money(kpis.profit, currency),
            expiring: kpis.expiring.to_string(),
            overdue: kpis.overdue.to_string(),
            maintenance: kpis.maintenance.to_string(),
        }
    }
}

/// One entry of the alert feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertItem {
    pub title: String,
    pub detail: String,
}

impl AlertItem {
    /// Alert entries, or the single "no urgent alerts" placeholder
    pub fn feed(alerts: &[Alert], window_days: i64) -> Vec<AlertItem> {
        if alerts.is_empty() {
            return vec![AlertItem {
                title: "No urgent alerts".to_string(),
                detail: format!("No contracts expiring in the next {} days.", window_days),
            }];
        }

        alerts
            .iter()
            .map(|a| AlertItem {
                title: "Contract expiring soon".to_string(),
                detail: format!("{} • {} days left", or_dash(&a.unit), a.days_left),
            })
            .collect()
    }
}

/// Recent-activity row as displayed
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: String,
    pub tenant: String,
    pub days_left: String,
    pub rent_in: String,
    pub rent_out: String,
    pub profit: String,
    pub profit_positive: bool,
    pub status: String,
    pub badge: &'static str,
}

impl TableRow {
    pub fn new(row: &RecentRow, currency: &str) -> Self {
        Self {
            unit: or_dash(&row.unit),
            kind: or_dash(&row.kind),
            owner: or_dash(&row.owner),
            tenant: or_dash(&row.tenant),
            days_left: row
                .days_left
                .map(|d| d.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            rent_in: money(row.rent_in, currency),
            rent_out: money(row.rent_out, currency),
            profit: money(row.profit, currency),
            profit_positive: row.profit >= 0.0,
            status: row.status.to_string(),
            badge: row.status.badge(),
        }
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub now: String,
    pub source: String,
    pub sheet_url: Option<String>,
    pub currency: String,
    pub kpis: KpiPanel,
    pub alerts: Vec<AlertItem>,
    pub recent: Vec<TableRow>,
    pub search: Option<String>,
    pub range: ChartRange,
    pub trend: Series,
    pub breakdown: Breakdown,
}

const TABLE_HEADERS: [&str; 9] = [
    "Unit", "Type", "Owner", "Tenant", "Days", "Rent In", "Rent Out", "Profit", "Status",
];

impl DashboardView {
    /// Plain-text rendering; charts are drawn only when a surface is given
    pub fn render_text(&self, charts: Option<&dyn ChartSurface>) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Dashboard • {} • source: {}", self.now, self.source);
        if let Some(url) = &self.sheet_url {
            let _ = writeln!(out, "Sheet: {}", url);
        }
        out.push('\n');

        let k = &self.kpis;
        let _ = writeln!(out, "  Total units   {}", k.total_units);
        let _ = writeln!(out, "  Occupied      {}", k.occupied);
        let _ = writeln!(out, "  Profit        {}", k.profit);
        let _ = writeln!(out, "  Expiring      {}", k.expiring);
        let _ = writeln!(out, "  Overdue       {}", k.overdue);
        let _ = writeln!(out, "  Maintenance   {}", k.maintenance);
        out.push('\n');

        out.push_str("Alerts\n");
        for alert in &self.alerts {
            let _ = writeln!(out, "  {}: {}", alert.title, alert.detail);
        }
        out.push('\n');

        match &self.search {
            Some(q) => {
                let _ = writeln!(out, "Recent activity (search: {:?})", q);
            }
            None => out.push_str("Recent activity\n"),
        }
        out.push_str(&self.render_table());

        if let Some(surface) = charts {
            out.push('\n');
            let title = format!("Profit trend ({})", self.range);
            out.push_str(&surface.draw_trend(&title, &self.trend, &self.currency));
            out.push('\n');
            out.push_str(&surface.draw_breakdown(&self.breakdown, &self.currency));
        }

        out
    }

    fn render_table(&self) -> String {
        if self.recent.is_empty() {
            return "  No properties yet.\n".to_string();
        }

        let cells: Vec<[String; 9]> = self
            .recent
            .iter()
            .map(|r| {
                let profit = if r.profit_positive {
                    format!("+{}", r.profit)
                } else {
                    r.profit.clone()
                };
                [
                    r.unit.clone(),
                    r.kind.clone(),
                    r.owner.clone(),
                    r.tenant.clone(),
                    r.days_left.clone(),
                    r.rent_in.clone(),
                    r.rent_out.clone(),
                    profit,
                    r.status.clone(),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = table_line(&TABLE_HEADERS, &widths);
        let total: usize = widths.iter().map(|w| w + 2).sum();
        let _ = writeln!(out, "  {}", "-".repeat(total));
        for row in &cells {
            let fields: Vec<&str> = row.iter().map(String::as_str).collect();
            out.push_str(&table_line(&fields, &widths));
        }
        out
    }
}

fn table_line(fields: &[&str], widths: &[usize]) -> String {
    let mut s = String::from(" ");
    for (field, w) in fields.iter().zip(widths) {
        let pad = w.saturating_sub(field.chars().count());
        let _ = write!(s, " {}{} ", field, " ".repeat(pad));
    }
    s.trim_end().to_string() + "\n"
}
