//! The filter-and-aggregate pipeline.
//!
//! A run takes an explicit `CatalogSnapshot` and a `FilterSelection` and
//! goes Executor -> Normalizer -> Aggregator from scratch. Nothing is cached
//! between runs.

mod session;

pub use session::{DashboardSession, SelectionChange, SelectionError, SelectionRequest};

use crate::aggregate::{aggregate, AggregationSettings, DashboardAggregates};
use crate::catalog::Catalog;
use crate::normalize::{normalize, NormalizedRecord, SeasonApproximation};
use crate::query::{execute, extract_dimensions, DimensionOptions, FilterSelection, Predicate};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// An immutable catalog plus the option lists derived from it.
#[derive(Clone, Debug)]
pub struct CatalogSnapshot {
    catalog: Catalog,
    options: DimensionOptions,
}

impl CatalogSnapshot {
    pub fn new(catalog: Catalog) -> Self {
        let options = extract_dimensions(&catalog);
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &DimensionOptions {
        &self.options
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineSettings {
    pub seasons: SeasonApproximation,
    pub aggregation: AggregationSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DashboardOutcome {
    /// The selection matched no title; nothing was aggregated.
    NoMatches,
    Results(DashboardResults),
}

impl DashboardOutcome {
    pub fn results(&self) -> Option<&DashboardResults> {
        match self {
            DashboardOutcome::NoMatches => None,
            DashboardOutcome::Results(results) => Some(results),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardResults {
    pub rows: Vec<NormalizedRecord>,
    pub aggregates: DashboardAggregates,
}

/// One line of the detailed listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub title: String,
    pub kind: Option<String>,
    pub primary_country: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub genres: Option<String>,
}

impl DashboardResults {
    /// Rows for the detail listing, newest release first. Rows without a
    /// year go last; equal years keep result order.
    pub fn detail_rows(&self) -> Vec<DetailRow> {
        let mut rows: Vec<&NormalizedRecord> = self.rows.iter().collect();
        rows.sort_by(|a, b| match (a.record.release_year, b.record.release_year) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows.into_iter()
            .map(|r| DetailRow {
                title: r.record.title.clone(),
                kind: r.record.kind.clone(),
                primary_country: r.record.primary_country.clone(),
                release_year: r.record.release_year,
                rating: r.record.rating.clone(),
                duration: r.record.duration_raw.clone(),
                genres: r.record.genres.clone(),
            })
            .collect()
    }
}

/// Runs the whole pipeline for `selection` over `snapshot`.
pub fn run(
    snapshot: &CatalogSnapshot,
    selection: &FilterSelection,
    settings: &PipelineSettings,
) -> DashboardOutcome {
    let predicate = Predicate::from_selection(selection);
    let rows = execute(snapshot.catalog(), &predicate);
    if rows.is_empty() {
        debug!("Selection matched no titles");
        return DashboardOutcome::NoMatches;
    }

    let rows = normalize(rows, &settings.seasons);
    let aggregates = aggregate(&rows, &settings.aggregation);
    DashboardOutcome::Results(DashboardResults { rows, aggregates })
}
