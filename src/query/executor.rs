use super::predicate::Predicate;
use crate::catalog::{Catalog, CatalogRecord};
use serde::Serialize;
use tracing::debug;

/// The fields of a matching record needed downstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectedRecord {
    pub id: String,
    pub kind: Option<String>,
    pub title: String,
    pub primary_country: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration_raw: Option<String>,
    pub genres: Option<String>,
}

impl From<&CatalogRecord> for ProjectedRecord {
    fn from(record: &CatalogRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.kind.clone(),
            title: record.title.clone(),
            primary_country: record.primary_country().map(String::from),
            release_year: record.release_year,
            rating: record.rating.clone(),
            duration_raw: record.duration_raw.clone(),
            genres: record.genres.clone(),
        }
    }
}

/// Applies `predicate` to the catalog, keeping catalog order. An empty
/// result is a valid outcome.
pub fn execute(catalog: &Catalog, predicate: &Predicate) -> Vec<ProjectedRecord> {
    let rows: Vec<ProjectedRecord> = catalog
        .iter()
        .filter(|record| predicate.matches(record))
        .map(ProjectedRecord::from)
        .collect();
    debug!(
        "Query with {} clauses matched {} of {} titles",
        predicate.clauses().len(),
        rows.len(),
        catalog.len()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterSelection;

    fn record(id: &str, kind: &str, year: i32) -> CatalogRecord {
        CatalogRecord {
            id: id.to_string(),
            kind: Some(kind.to_string()),
            title: format!("Title {}", id),
            country_list: Some("United States, Canada".to_string()),
            release_year: Some(year),
            rating: Some("PG".to_string()),
            duration_raw: Some("90 min".to_string()),
            genres: Some("Dramas".to_string()),
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            record("1", "Movie", 2019),
            record("2", "TV Show", 2020),
            record("3", "Movie", 2020),
            record("4", "TV Show", 2021),
            record("5", "Movie", 2021),
        ])
    }

    #[test]
    fn unconstrained_selection_returns_full_catalog() {
        let catalog = sample_catalog();
        let predicate = Predicate::from_selection(&FilterSelection::unconstrained());

        let rows = execute(&catalog, &predicate);

        let expected: Vec<ProjectedRecord> =
            catalog.iter().map(ProjectedRecord::from).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn kind_selection_keeps_catalog_order() {
        let catalog = sample_catalog();
        let selection = FilterSelection::unconstrained().with_kinds(["Movie"]);

        let rows = execute(&catalog, &Predicate::from_selection(&selection));

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let catalog = sample_catalog();
        let selection = FilterSelection::unconstrained().with_years([1950]);
        assert!(execute(&catalog, &Predicate::from_selection(&selection)).is_empty());
    }

    #[test]
    fn projection_derives_primary_country() {
        let projected = ProjectedRecord::from(&record("1", "Movie", 2019));
        assert_eq!(projected.primary_country.as_deref(), Some("United States"));
        assert_eq!(projected.duration_raw.as_deref(), Some("90 min"));
    }

    #[test]
    fn execution_is_deterministic() {
        let catalog = sample_catalog();
        let selection = FilterSelection::unconstrained().with_years([2020, 2021]);
        let predicate = Predicate::from_selection(&selection);
        assert_eq!(execute(&catalog, &predicate), execute(&catalog, &predicate));
    }
}
