use crate::catalog::Catalog;
use serde::Serialize;
use std::collections::BTreeSet;

/// The option lists offered by the selection widgets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DimensionOptions {
    pub kinds: Vec<String>,
    pub years: Vec<i32>,
    pub countries: Vec<String>,
}

/// Distinct kinds, years and primary countries of the whole catalog, each
/// sorted ascending. Never depends on the current selection.
pub fn extract_dimensions(catalog: &Catalog) -> DimensionOptions {
    let mut kinds = BTreeSet::new();
    let mut years = BTreeSet::new();
    let mut countries = BTreeSet::new();

    for record in catalog.iter() {
        if let Some(kind) = record.kind.as_deref() {
            kinds.insert(kind);
        }
        if let Some(year) = record.release_year {
            years.insert(year);
        }
        if let Some(country) = record.primary_country() {
            countries.insert(country);
        }
    }

    DimensionOptions {
        kinds: kinds.into_iter().map(String::from).collect(),
        years: years.into_iter().collect(),
        countries: countries.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;

    fn record(
        id: &str,
        kind: Option<&str>,
        year: Option<i32>,
        countries: Option<&str>,
    ) -> CatalogRecord {
        CatalogRecord {
            id: id.to_string(),
            kind: kind.map(String::from),
            title: format!("Title {}", id),
            country_list: countries.map(String::from),
            release_year: year,
            rating: None,
            duration_raw: None,
            genres: None,
        }
    }

    #[test]
    fn extracts_sorted_distinct_options() {
        let catalog = Catalog::from_records(vec![
            record("1", Some("TV Show"), Some(2021), Some("India, United States")),
            record("2", Some("Movie"), Some(1999), Some("United States")),
            record("3", Some("Movie"), Some(2021), Some("Brazil")),
            record("4", None, None, None),
            record("5", Some("Movie"), Some(2005), Some("")),
        ]);

        let options = extract_dimensions(&catalog);

        assert_eq!(options.kinds, vec!["Movie", "TV Show"]);
        assert_eq!(options.years, vec![1999, 2005, 2021]);
        assert_eq!(options.countries, vec!["Brazil", "India", "United States"]);
    }

    #[test]
    fn empty_catalog_has_no_options() {
        let options = extract_dimensions(&Catalog::default());
        assert_eq!(options, DimensionOptions::default());
    }
}
