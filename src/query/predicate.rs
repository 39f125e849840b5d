//! Filter selections and the structured predicate built from them.
//!
//! A `FilterSelection` holds the values chosen for each dimension. It is
//! turned into a `Predicate`: a conjunction of tagged `FilterClause`s, one
//! per dimension with a non-empty selection. Selected values are only ever
//! compared against record fields; no query text is built from them.

use super::dimensions::DimensionOptions;
use crate::catalog::CatalogRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A filterable attribute of a catalog record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Kind,
    Year,
    Country,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Kind => write!(f, "kind"),
            Dimension::Year => write!(f, "year"),
            Dimension::Country => write!(f, "country"),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kind" | "type" => Ok(Dimension::Kind),
            "year" | "release_year" => Ok(Dimension::Year),
            "country" => Ok(Dimension::Country),
            other => Err(format!("Unknown dimension '{}'", other)),
        }
    }
}

/// Initial country selection when a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountrySelectionDefault {
    /// Nothing selected, which leaves the country dimension unconstrained.
    #[default]
    None,
    All,
}

/// Values chosen for each dimension. An empty set constrains nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub kinds: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub countries: BTreeSet<String>,
}

impl FilterSelection {
    /// A selection that constrains nothing.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Default widget state: every kind and every year selected, countries
    /// per `countries`.
    pub fn initial(options: &DimensionOptions, countries: CountrySelectionDefault) -> Self {
        Self {
            kinds: options.kinds.iter().cloned().collect(),
            years: options.years.iter().copied().collect(),
            countries: match countries {
                CountrySelectionDefault::None => BTreeSet::new(),
                CountrySelectionDefault::All => options.countries.iter().cloned().collect(),
            },
        }
    }

    pub fn with_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years<I: IntoIterator<Item = i32>>(mut self, years: I) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.kinds.is_empty() && self.years.is_empty() && self.countries.is_empty()
    }

    pub fn len(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Kind => self.kinds.len(),
            Dimension::Year => self.years.len(),
            Dimension::Country => self.countries.len(),
        }
    }
}

/// One active per-dimension membership test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterClause {
    KindIn(BTreeSet<String>),
    YearIn(BTreeSet<i32>),
    PrimaryCountryIn(BTreeSet<String>),
}

impl FilterClause {
    pub fn dimension(&self) -> Dimension {
        match self {
            FilterClause::KindIn(_) => Dimension::Kind,
            FilterClause::YearIn(_) => Dimension::Year,
            FilterClause::PrimaryCountryIn(_) => Dimension::Country,
        }
    }

    /// Null record fields never match an active clause.
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        match self {
            FilterClause::KindIn(kinds) => record
                .kind
                .as_deref()
                .is_some_and(|kind| kinds.contains(kind)),
            FilterClause::YearIn(years) => record
                .release_year
                .is_some_and(|year| years.contains(&year)),
            FilterClause::PrimaryCountryIn(countries) => record
                .primary_country()
                .is_some_and(|country| countries.contains(country)),
        }
    }
}

/// Conjunction of filter clauses; no clauses accepts every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<FilterClause>,
}

impl Predicate {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn from_selection(selection: &FilterSelection) -> Self {
        let mut clauses = Vec::with_capacity(3);
        if !selection.kinds.is_empty() {
            clauses.push(FilterClause::KindIn(selection.kinds.clone()));
        }
        if !selection.years.is_empty() {
            clauses.push(FilterClause::YearIn(selection.years.clone()));
        }
        if !selection.countries.is_empty() {
            clauses.push(FilterClause::PrimaryCountryIn(selection.countries.clone()));
        }
        Self { clauses }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn matches(&self, record: &CatalogRecord) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: Option<&str>, year: Option<i32>, countries: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            id: "s1".to_string(),
            kind: kind.map(String::from),
            title: "T".to_string(),
            country_list: countries.map(String::from),
            release_year: year,
            rating: None,
            duration_raw: None,
            genres: None,
        }
    }

    #[test]
    fn empty_selection_builds_no_clauses() {
        let predicate = Predicate::from_selection(&FilterSelection::unconstrained());
        assert!(predicate.clauses().is_empty());
        assert!(predicate.matches(&record(None, None, None)));
        assert!(predicate.matches(&record(Some("Movie"), Some(2000), Some("Italy"))));
    }

    #[test]
    fn only_non_empty_dimensions_become_clauses() {
        let selection = FilterSelection::unconstrained().with_years([2019, 2020]);
        let predicate = Predicate::from_selection(&selection);

        assert_eq!(predicate.clauses().len(), 1);
        assert_eq!(predicate.clauses()[0].dimension(), Dimension::Year);
        assert!(predicate.matches(&record(Some("Movie"), Some(2019), None)));
        assert!(!predicate.matches(&record(Some("Movie"), Some(2018), None)));
        assert!(!predicate.matches(&record(Some("Movie"), None, None)));
    }

    #[test]
    fn clauses_are_combined_with_and() {
        let selection = FilterSelection::unconstrained()
            .with_kinds(["Movie"])
            .with_countries(["India"]);
        let predicate = Predicate::from_selection(&selection);

        assert!(predicate.matches(&record(Some("Movie"), None, Some("India, Nepal"))));
        assert!(!predicate.matches(&record(Some("TV Show"), None, Some("India"))));
        assert!(!predicate.matches(&record(Some("Movie"), None, Some("Nepal, India"))));
        assert!(!predicate.matches(&record(Some("Movie"), None, None)));
    }

    #[test]
    fn selected_values_are_matched_literally() {
        let selection = FilterSelection::unconstrained().with_kinds(["Movie' OR '1'='1"]);
        let predicate = Predicate::from_selection(&selection);
        assert!(!predicate.matches(&record(Some("Movie"), None, None)));
    }

    #[test]
    fn initial_selection_keeps_countries_empty_by_default() {
        let options = DimensionOptions {
            kinds: vec!["Movie".to_string(), "TV Show".to_string()],
            years: vec![2019, 2020],
            countries: vec!["India".to_string()],
        };

        let selection = FilterSelection::initial(&options, CountrySelectionDefault::None);
        assert_eq!(selection.len(Dimension::Kind), 2);
        assert_eq!(selection.len(Dimension::Year), 2);
        assert_eq!(selection.len(Dimension::Country), 0);

        let selection = FilterSelection::initial(&options, CountrySelectionDefault::All);
        assert_eq!(selection.len(Dimension::Country), 1);
    }

    #[test]
    fn parses_dimensions() {
        assert_eq!("kind".parse::<Dimension>(), Ok(Dimension::Kind));
        assert_eq!("Type".parse::<Dimension>(), Ok(Dimension::Kind));
        assert_eq!("YEAR".parse::<Dimension>(), Ok(Dimension::Year));
        assert_eq!("country".parse::<Dimension>(), Ok(Dimension::Country));
        assert!("genre".parse::<Dimension>().is_err());
    }
}
