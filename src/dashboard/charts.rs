//! Chart data and drawing
//!
//! Two charts: the monthly profit trend over a trailing window and the
//! income/expense/profit breakdown. Drawing goes through [`ChartSurface`];
//! with no surface the charts are simply skipped.

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::format::money;
use crate::records::dates::parse_date_time;
use crate::records::PropertyRecord;

const MIN_ALL_MONTHS: u32 = 12;

/// Trailing window of the profit trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartRange {
    SixMonths,
    TwelveMonths,
    All,
}

impl FromStr for ChartRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "6m" => Ok(ChartRange::SixMonths),
            "12m" => Ok(ChartRange::TwelveMonths),
            "all" => Ok(ChartRange::All),
            other => Err(format!("Invalid range: {}. Use: 6m, 12m, all", other)),
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartRange::SixMonths => "6m",
            ChartRange::TwelveMonths => "12m",
            ChartRange::All => "all",
        })
    }
}

/// Labelled values for a line chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Income vs expenses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Income is total rent out, expenses total rent in
pub fn breakdown(records: &[PropertyRecord]) -> Breakdown {
    let income: f64 = records.iter().map(|r| r.rent_out_monthly).sum();
    let expenses: f64 = records.iter().map(|r| r.rent_in_monthly).sum();
    Breakdown {
        income,
        expenses,
        profit: income - expenses,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First days of the `count` months ending with the month of `today`
pub fn month_starts(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let current = first_of_month(today);
    (0..count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// Months from the earliest record creation to now, at least twelve
fn months_for_all(records: &[PropertyRecord], today: NaiveDate) -> u32 {
    let earliest = records
        .iter()
        .filter_map(|r| r.created_at_utc.as_deref().and_then(parse_date_time))
        .map(|dt| dt.date())
        .min();

    let span = earliest
        .filter(|e| *e <= today)
        .map(|e| {
            let months = (today.year() - e.year()) * 12 + today.month() as i32 - e.month() as i32;
            months.max(0) as u32 + 1
        })
        .unwrap_or(MIN_ALL_MONTHS);

    span.max(MIN_ALL_MONTHS)
}

/// Monthly profit over the trailing window
///
/// A month counts every record created on or before its last day; records
/// with no usable creation time count in every month.
pub fn profit_trend(records: &[PropertyRecord], today: NaiveDate, range: ChartRange) -> Series {
    let count = match range {
        ChartRange::SixMonths => 6,
        ChartRange::TwelveMonths => 12,
        ChartRange::All => months_for_all(records, today),
    };

    let created: Vec<_> = records
        .iter()
        .map(|r| r.created_at_utc.as_deref().and_then(parse_date_time))
        .collect();

    let mut series = Series::default();
    for start in month_starts(today, count) {
        let Some(next) = start.checked_add_months(Months::new(1)) else {
            continue;
        };
        let cutoff = next.and_time(NaiveTime::MIN);

        let profit: f64 = records
            .iter()
            .zip(&created)
            .filter(|(_, created)| created.map_or(true, |c| c < cutoff))
            .map(|(r, _)| r.profit())
            .sum();

        series.labels.push(start.format("%b %y").to_string());
        series.values.push((profit * 100.0).round() / 100.0);
    }
    series
}

/// Something that can draw the two dashboard charts
pub trait ChartSurface {
    fn draw_trend(&self, title: &str, series: &Series, currency: &str) -> String;
    fn draw_breakdown(&self, breakdown: &Breakdown, currency: &str) -> String;
}

/// Horizontal bar charts for the terminal
#[derive(Debug, Clone)]
pub struct TerminalCharts {
    /// Width of the longest bar in characters
    pub width: usize,
}

impl Default for TerminalCharts {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl TerminalCharts {
    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || value == 0.0 {
            return String::new();
        }
        let len = ((value.abs() / max) * self.width as f64).round().max(1.0) as usize;
        let glyph = if value < 0.0 { '░' } else { '█' };
        std::iter::repeat(glyph).take(len).collect()
    }

    fn rows(&self, rows: &[(String, f64)], currency: &str) -> String {
        let max = rows.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

        rows.iter()
            .map(|(label, value)| {
                format!(
                    "  {:<lw$}  {:<bw$}  {}\n",
                    label,
                    self.bar(*value, max),
                    money(*value, currency),
                    lw = label_width,
                    bw = self.width
                )
            })
            .collect()
    }
}

impl ChartSurface for TerminalCharts {
    fn draw_trend(&self, title: &str, series: &Series, currency: &str) -> String {
        let rows: Vec<(String, f64)> = series
            .labels
            .iter()
            .cloned()
            .zip(series.values.iter().copied())
            .collect();
        format!("{}\n{}", title, self.rows(&rows, currency))
    }

    fn draw_breakdown(&self, breakdown: &Breakdown, currency: &str) -> String {
        let rows = vec![
            ("Income".to_string(), breakdown.income),
            ("Expenses".to_string(), breakdown.expenses),
            ("Profit".to_string(), breakdown.profit),
        ];
        format!("Income vs Expenses\n{}", self.rows(&rows, currency))
    }
}
