//! Catalog Insights Library
//!
//! Loads a title catalog, filters it on kind, release year and primary
//! country, normalizes durations to minutes and aggregates the result into
//! dashboard KPIs and grouped counts.

pub mod aggregate;
pub mod catalog;
pub mod cli_style;
pub mod config;
pub mod dashboard;
pub mod normalize;
pub mod query;
pub mod render;
pub mod table_store;

// Re-export commonly used types for convenience
pub use catalog::{load_catalog, Catalog, CatalogRecord, LoadError, RawRowSource};
pub use config::{AppConfig, CliConfig, FileConfig, SourceKind};
pub use dashboard::{
    run, CatalogSnapshot, DashboardOutcome, DashboardSession, PipelineSettings, SelectionChange,
};
pub use query::{Dimension, FilterSelection};
pub use table_store::SqliteTableStore;
