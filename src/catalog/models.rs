//! Catalog models.
//!
//! `RawTable` is what every raw-row source produces: column names plus rows
//! of nullable text cells. `CatalogRecord` is a typed title entry mapped out
//! of a deduplicated `RawTable` through a `ColumnMapping`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Raw rows
// =============================================================================

/// A tabular dump of a source, cells kept as nullable text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Position of `name` in the column list.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`); short rows read as null.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// The first `n` rows, used for the raw data preview.
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Turns a raw text cell into a nullable value: empty text is null.
pub fn null_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Column mapping
// =============================================================================

/// Source column names for every `CatalogRecord` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub country_list: String,
    pub release_year: String,
    pub rating: String,
    pub duration: String,
    pub genres: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "show_id".to_string(),
            kind: "type".to_string(),
            title: "title".to_string(),
            country_list: "country".to_string(),
            release_year: "release_year".to_string(),
            rating: "rating".to_string(),
            duration: "duration".to_string(),
            genres: "listed_in".to_string(),
        }
    }
}

// =============================================================================
// Catalog record
// =============================================================================

/// One title entry of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    pub id: String,
    pub kind: Option<String>,
    pub title: String,
    pub country_list: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration_raw: Option<String>,
    pub genres: Option<String>,
}

impl CatalogRecord {
    /// First entry of the comma separated country list.
    pub fn primary_country(&self) -> Option<&str> {
        primary_country(self.country_list.as_deref())
    }
}

/// First comma separated entry of `country_list`, or `None` when that entry
/// is blank.
pub fn primary_country(country_list: Option<&str>) -> Option<&str> {
    let first = country_list?.split(',').next()?;
    if first.trim().is_empty() {
        None
    } else {
        Some(first)
    }
}

/// Parses a release year cell. Accepts integral floats ("2019.0") as CSV
/// exports of nullable integer columns often carry them.
pub fn parse_release_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
            Some(f as i32)
        }
        _ => None,
    }
}
