//! KPIs and grouped counts over a normalized result set.
//!
//! Grouped aggregates skip rows whose grouping key is null; those rows still
//! count towards `total_count`.

use crate::normalize::NormalizedRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const DEFAULT_TOP_COUNTRIES: usize = 10;

/// Settings for the aggregation step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Kinds that get their own headline count.
    pub headline_kinds: Vec<String>,
    pub top_countries_limit: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            headline_kinds: vec!["Movie".to_string(), "TV Show".to_string()],
            top_countries_limit: DEFAULT_TOP_COUNTRIES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

impl GroupCount {
    fn new(key: impl Into<String>, count: usize) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearKindCount {
    pub year: i32,
    pub kind: String,
    pub count: usize,
}

/// Everything the dashboard displays for one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardAggregates {
    pub total_count: usize,
    pub headline_kind_counts: Vec<GroupCount>,
    pub distinct_country_count: usize,
    /// `None` when no row has a parseable duration.
    pub mean_duration_minutes: Option<f64>,
    pub by_year_and_kind: Vec<YearKindCount>,
    pub by_kind: Vec<GroupCount>,
    pub top_countries: Vec<GroupCount>,
}

pub fn aggregate(rows: &[NormalizedRecord], settings: &AggregationSettings) -> DashboardAggregates {
    DashboardAggregates {
        total_count: rows.len(),
        headline_kind_counts: settings
            .headline_kinds
            .iter()
            .map(|kind| GroupCount::new(kind.as_str(), count_by_kind(rows, kind)))
            .collect(),
        distinct_country_count: distinct_country_count(rows),
        mean_duration_minutes: mean_duration_minutes(rows),
        by_year_and_kind: count_by_year_and_kind(rows),
        by_kind: group_by_kind(rows),
        top_countries: top_countries(rows, settings.top_countries_limit),
    }
}

/// Rows whose kind is exactly `kind`.
pub fn count_by_kind(rows: &[NormalizedRecord], kind: &str) -> usize {
    rows.iter()
        .filter(|r| r.record.kind.as_deref() == Some(kind))
        .count()
}

pub fn distinct_country_count(rows: &[NormalizedRecord]) -> usize {
    rows.iter()
        .filter_map(|r| r.record.primary_country.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn mean_duration_minutes(rows: &[NormalizedRecord]) -> Option<f64> {
    let (sum, count) = rows
        .iter()
        .filter_map(|r| r.duration_minutes)
        .fold((0.0, 0usize), |(sum, count), minutes| (sum + minutes, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Counts per (year, kind), year ascending then kind ascending.
pub fn count_by_year_and_kind(rows: &[NormalizedRecord]) -> Vec<YearKindCount> {
    let mut counts: BTreeMap<(i32, &str), usize> = BTreeMap::new();
    for row in rows {
        if let (Some(year), Some(kind)) = (row.record.release_year, row.record.kind.as_deref()) {
            *counts.entry((year, kind)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((year, kind), count)| YearKindCount {
            year,
            kind: kind.to_string(),
            count,
        })
        .collect()
}

/// Counts per kind, largest first; equal counts ordered by kind.
pub fn group_by_kind(rows: &[NormalizedRecord]) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for kind in rows.iter().filter_map(|r| r.record.kind.as_deref()) {
        *counts.entry(kind).or_default() += 1;
    }
    let mut grouped: Vec<GroupCount> = counts
        .into_iter()
        .map(|(kind, count)| GroupCount::new(kind, count))
        .collect();
    // stable: ties keep the kind order from the map
    grouped.sort_by(|a, b| b.count.cmp(&a.count));
    grouped
}

/// The `n` primary countries with the most rows, largest first. Equal counts
/// keep the order in which the countries first appear in `rows`.
pub fn top_countries(rows: &[NormalizedRecord], n: usize) -> Vec<GroupCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<GroupCount> = Vec::new();
    for country in rows.iter().filter_map(|r| r.record.primary_country.as_deref()) {
        match positions.get(country) {
            Some(&index) => grouped[index].count += 1,
            None => {
                positions.insert(country, grouped.len());
                grouped.push(GroupCount::new(country, 1));
            }
        }
    }
    grouped.sort_by(|a, b| b.count.cmp(&a.count));
    grouped.truncate(n);
    grouped
}

/// Year by kind matrix feeding the time-series chart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct YearKindPivot {
    /// Column labels, ascending.
    pub kinds: Vec<String>,
    pub rows: Vec<YearKindPivotRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct YearKindPivotRow {
    pub year: i32,
    /// One cell per entry of `kinds`; `None` where the pair never occurs.
    pub counts: Vec<Option<usize>>,
}

impl YearKindPivot {
    pub fn from_counts(counts: &[YearKindCount]) -> Self {
        let kinds: Vec<String> = counts
            .iter()
            .map(|c| c.kind.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect();

        let mut by_year: BTreeMap<i32, Vec<Option<usize>>> = BTreeMap::new();
        for c in counts {
            let cells = by_year
                .entry(c.year)
                .or_insert_with(|| vec![None; kinds.len()]);
            if let Some(column) = kinds.iter().position(|k| *k == c.kind) {
                cells[column] = Some(c.count);
            }
        }

        Self {
            kinds,
            rows: by_year
                .into_iter()
                .map(|(year, counts)| YearKindPivotRow { year, counts })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ProjectedRecord;

    fn row(
        id: &str,
        kind: Option<&str>,
        year: Option<i32>,
        country: Option<&str>,
        minutes: Option<f64>,
    ) -> NormalizedRecord {
        NormalizedRecord {
            record: ProjectedRecord {
                id: id.to_string(),
                kind: kind.map(String::from),
                title: format!("Title {}", id),
                primary_country: country.map(String::from),
                release_year: year,
                rating: None,
                duration_raw: None,
                genres: None,
            },
            duration_value: minutes,
            duration_unit: Some("min".to_string()),
            duration_minutes: minutes,
        }
    }

    fn sample() -> Vec<NormalizedRecord> {
        vec![
            row("1", Some("Movie"), Some(2020), Some("India"), Some(100.0)),
            row("2", Some("Movie"), Some(2019), Some("United States"), Some(80.0)),
            row("3", Some("TV Show"), Some(2020), Some("India"), Some(900.0)),
            row("4", Some("Movie"), Some(2020), None, None),
            row("5", None, Some(2021), Some("France"), None),
            row("6", Some("TV Show"), None, Some("United States"), Some(450.0)),
        ]
    }

    #[test]
    fn computes_kpis() {
        let aggregates = aggregate(&sample(), &AggregationSettings::default());

        assert_eq!(aggregates.total_count, 6);
        assert_eq!(
            aggregates.headline_kind_counts,
            vec![GroupCount::new("Movie", 3), GroupCount::new("TV Show", 2)]
        );
        assert_eq!(aggregates.distinct_country_count, 3);
        assert_eq!(aggregates.mean_duration_minutes, Some(382.5));
    }

    #[test]
    fn mean_is_not_available_without_durations() {
        let rows = vec![row("1", Some("Movie"), None, None, None)];
        assert_eq!(mean_duration_minutes(&rows), None);
        assert_eq!(mean_duration_minutes(&[]), None);
    }

    #[test]
    fn counts_by_year_and_kind_sorted_by_year() {
        let counts = count_by_year_and_kind(&sample());
        let flat: Vec<(i32, &str, usize)> = counts
            .iter()
            .map(|c| (c.year, c.kind.as_str(), c.count))
            .collect();
        assert_eq!(
            flat,
            vec![(2019, "Movie", 1), (2020, "Movie", 2), (2020, "TV Show", 1)]
        );
    }

    #[test]
    fn groups_by_kind_largest_first() {
        assert_eq!(
            group_by_kind(&sample()),
            vec![GroupCount::new("Movie", 3), GroupCount::new("TV Show", 2)]
        );
    }

    #[test]
    fn top_countries_ties_keep_first_appearance() {
        let rows = vec![
            row("1", None, None, Some("Spain"), None),
            row("2", None, None, Some("Japan"), None),
            row("3", None, None, Some("Japan"), None),
            row("4", None, None, Some("Spain"), None),
            row("5", None, None, Some("Chile"), None),
            row("6", None, None, Some("Korea"), None),
            row("7", None, None, Some("Korea"), None),
            row("8", None, None, Some("Korea"), None),
        ];

        let top = top_countries(&rows, 3);
        assert_eq!(
            top,
            vec![
                GroupCount::new("Korea", 3),
                GroupCount::new("Spain", 2),
                GroupCount::new("Japan", 2),
            ]
        );
    }

    #[test]
    fn top_countries_is_bounded_and_sorted() {
        let rows: Vec<NormalizedRecord> = (0..25)
            .map(|i| {
                let country = format!("Country {}", i % 13);
                row(&i.to_string(), None, None, Some(country.as_str()), None)
            })
            .collect();

        let top = top_countries(&rows, DEFAULT_TOP_COUNTRIES);

        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn pivots_year_kind_counts() {
        let pivot = YearKindPivot::from_counts(&count_by_year_and_kind(&sample()));

        assert_eq!(pivot.kinds, vec!["Movie", "TV Show"]);
        assert_eq!(pivot.rows.len(), 2);
        assert_eq!(pivot.rows[0].year, 2019);
        assert_eq!(pivot.rows[0].counts, vec![Some(1), None]);
        assert_eq!(pivot.rows[1].year, 2020);
        assert_eq!(pivot.rows[1].counts, vec![Some(2), Some(1)]);
    }

    #[test]
    fn empty_rows_give_empty_groups() {
        let aggregates = aggregate(&[], &AggregationSettings::default());
        assert_eq!(aggregates.total_count, 0);
        assert!(aggregates.by_kind.is_empty());
        assert!(aggregates.top_countries.is_empty());
        assert!(YearKindPivot::from_counts(&aggregates.by_year_and_kind).is_empty());
    }
}
