//! Rendering of pipeline outcomes.
//!
//! `present` drives any `DashboardRenderer` from a `DashboardOutcome`: KPI
//! metrics, the year/kind time series, the two bar charts and, on request,
//! the detail listing. A `NoMatches` outcome renders a single notice.

mod json;
mod terminal;

pub use json::{JsonRenderer, Section};
pub use terminal::TerminalRenderer;

use crate::aggregate::{GroupCount, YearKindPivot};
use crate::catalog::RawTable;
use crate::dashboard::DashboardOutcome;
use anyhow::Result;
use serde::Serialize;

pub const NO_MATCHES_NOTICE: &str = "No title matches the selected filters.";
pub const NOT_ENOUGH_DATA_NOTICE: &str = "Not enough data for this chart.";
pub const NOT_AVAILABLE: &str = "N/A";

/// Value of a scalar metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Count(usize),
    Minutes(f64),
    NotAvailable,
}

impl MetricValue {
    pub fn minutes(value: Option<f64>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Minutes)
    }

    pub fn display(&self) -> String {
        match self {
            MetricValue::Count(count) => format_count(*count),
            MetricValue::Minutes(minutes) => format!("{:.0} min", minutes),
            MetricValue::NotAvailable => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Formats a count with spaces as thousands separators: 8807 -> "8 807".
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// The display surface the dashboard draws on.
pub trait DashboardRenderer {
    fn metric(&mut self, label: &str, value: MetricValue) -> Result<()>;

    /// Two-dimensional series: one line per kind over the years.
    fn line_chart(&mut self, title: &str, series: &YearKindPivot) -> Result<()>;

    fn bar_chart(&mut self, title: &str, series: &[GroupCount]) -> Result<()>;

    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()>;

    fn notice(&mut self, message: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentOptions {
    pub show_detail: bool,
}

fn text_or_empty(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

/// Renders `outcome` on `renderer`.
pub fn present(
    outcome: &DashboardOutcome,
    options: PresentOptions,
    renderer: &mut dyn DashboardRenderer,
) -> Result<()> {
    let results = match outcome {
        DashboardOutcome::NoMatches => return renderer.notice(NO_MATCHES_NOTICE),
        DashboardOutcome::Results(results) => results,
    };
    let aggregates = &results.aggregates;

    renderer.metric("Titles", MetricValue::Count(aggregates.total_count))?;
    for kind_count in &aggregates.headline_kind_counts {
        renderer.metric(
            &format!("{} count", kind_count.key),
            MetricValue::Count(kind_count.count),
        )?;
    }
    renderer.metric(
        "Countries",
        MetricValue::Count(aggregates.distinct_country_count),
    )?;
    renderer.metric(
        "Mean duration",
        MetricValue::minutes(aggregates.mean_duration_minutes),
    )?;

    let pivot = YearKindPivot::from_counts(&aggregates.by_year_and_kind);
    if pivot.is_empty() {
        renderer.notice(NOT_ENOUGH_DATA_NOTICE)?;
    } else {
        renderer.line_chart("Titles per year and kind", &pivot)?;
    }

    renderer.bar_chart("Titles per kind", &aggregates.by_kind)?;
    renderer.bar_chart(
        &format!("Top {} countries by titles", aggregates.top_countries.len()),
        &aggregates.top_countries,
    )?;

    if options.show_detail {
        let rows = results
            .detail_rows()
            .into_iter()
            .map(|r| {
                vec![
                    r.title,
                    text_or_empty(r.kind.as_deref()),
                    text_or_empty(r.primary_country.as_deref()),
                    r.release_year.map(|y| y.to_string()).unwrap_or_default(),
                    text_or_empty(r.rating.as_deref()),
                    text_or_empty(r.duration.as_deref()),
                    text_or_empty(r.genres.as_deref()),
                ]
            })
            .collect();
        renderer.table(
            "Filtered titles",
            &[
                "Title", "Kind", "Country", "Year", "Rating", "Duration", "Genres",
            ],
            rows,
        )?;
    }
    Ok(())
}

/// Renders the first `n` raw rows as they were read.
pub fn present_preview(
    raw: &RawTable,
    n: usize,
    renderer: &mut dyn DashboardRenderer,
) -> Result<()> {
    let head = raw.head(n);
    let headers: Vec<&str> = head.columns.iter().map(String::as_str).collect();
    let rows = head
        .rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|i| text_or_empty(row.get(i).and_then(|c| c.as_deref())))
                .collect()
        })
        .collect();
    renderer.table("Raw data preview", &headers, rows)
}
