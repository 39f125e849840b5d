//! Catalog loading: primary key deduplication and column mapping.

use super::models::{null_if_empty, parse_release_year, CatalogRecord, ColumnMapping, RawTable};
use super::source::RawRowSource;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Structural failures that abort a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Primary key column '{field}' not found, available columns: {available:?}")]
    MissingPrimaryKey {
        field: String,
        available: Vec<String>,
    },

    #[error("Table '{0}' not found in the table store")]
    MissingTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Keeps only the first row for every distinct value of `key`, preserving
/// input order. Rows with a null key collapse into a single row as well.
pub fn dedupe_by_key(table: RawTable, key: &str) -> Result<RawTable, LoadError> {
    let key_index = table
        .column_index(key)
        .ok_or_else(|| LoadError::MissingPrimaryKey {
            field: key.to_string(),
            available: table.columns.clone(),
        })?;

    let RawTable { columns, rows } = table;
    let mut seen: HashSet<Option<String>> = HashSet::with_capacity(rows.len());
    let rows = rows
        .into_iter()
        .filter(|row| seen.insert(row.get(key_index).cloned().flatten()))
        .collect();

    Ok(RawTable { columns, rows })
}

/// The deduplicated title catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    duplicates_dropped: usize,
}

impl Catalog {
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        Self {
            records,
            duplicates_dropped: 0,
        }
    }

    /// Dedupes `table` on the mapped id column, then maps every row into a
    /// `CatalogRecord`. Mapped columns missing from the table read as null.
    pub fn from_raw(table: RawTable, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let total_rows = table.len();
        let table = dedupe_by_key(table, &mapping.id)?;
        let duplicates_dropped = total_rows - table.len();

        // dedupe_by_key already guarantees the id column exists
        let id_index = table.column_index(&mapping.id);
        let kind_index = table.column_index(&mapping.kind);
        let title_index = table.column_index(&mapping.title);
        let country_index = table.column_index(&mapping.country_list);
        let year_index = table.column_index(&mapping.release_year);
        let rating_index = table.column_index(&mapping.rating);
        let duration_index = table.column_index(&mapping.duration);
        let genres_index = table.column_index(&mapping.genres);

        let text = |row: usize, index: Option<usize>| -> Option<String> {
            index
                .and_then(|i| table.cell(row, i))
                .and_then(null_if_empty)
        };

        let records = (0..table.len())
            .map(|row| CatalogRecord {
                id: text(row, id_index).unwrap_or_default(),
                kind: text(row, kind_index),
                title: text(row, title_index).unwrap_or_default(),
                country_list: text(row, country_index),
                release_year: year_index
                    .and_then(|i| table.cell(row, i))
                    .and_then(parse_release_year),
                rating: text(row, rating_index),
                duration_raw: text(row, duration_index),
                genres: text(row, genres_index),
            })
            .collect();

        Ok(Self {
            records,
            duplicates_dropped,
        })
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many input rows were collapsed into an earlier row with the same id.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}

/// Reads every row from `source` and builds the deduplicated catalog.
pub fn load_catalog(
    source: &dyn RawRowSource,
    mapping: &ColumnMapping,
) -> Result<Catalog, LoadError> {
    info!("Loading catalog from {}...", source.describe());
    let table = source.read_rows()?;
    debug!("Read {} rows with columns {:?}", table.len(), table.columns);
    let catalog = Catalog::from_raw(table, mapping)?;
    info!(
        "Catalog has {} titles ({} duplicate rows dropped)",
        catalog.len(),
        catalog.duplicates_dropped()
    );
    Ok(catalog)
}
