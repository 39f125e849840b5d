mod load;
mod models;
mod source;

pub use load::{dedupe_by_key, load_catalog, Catalog, LoadError};
pub use models::{
    null_if_empty, parse_release_year, primary_country, CatalogRecord, ColumnMapping, RawTable,
};
pub use source::{read_csv, CsvSource, RawRowSource, StoreTableSource};
