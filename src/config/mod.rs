mod file_config;

pub use file_config::{
    AggregationConfig, ColumnsConfig, DefaultsConfig, FileConfig, NormalizationConfig,
};

use crate::aggregate::AggregationSettings;
use crate::catalog::{ColumnMapping, CsvSource, RawRowSource, StoreTableSource};
use crate::dashboard::PipelineSettings;
use crate::normalize::SeasonApproximation;
use crate::query::CountrySelectionDefault;
use crate::table_store::validate_table_name;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data_csv";
pub const DEFAULT_DB_PATH: &str = "data/catalog.db";
pub const DEFAULT_TITLES_TABLE: &str = "table_titles";

/// Where the title rows are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// The titles CSV file in the data directory.
    #[default]
    Csv,
    /// The titles table of the SQLite table store.
    Store,
}

fn parse_source_kind(value: &str) -> Option<SourceKind> {
    SourceKind::from_str(value, true).ok()
}

fn parse_country_default(value: &str) -> Option<CountrySelectionDefault> {
    match value.to_lowercase().as_str() {
        "none" => Some(CountrySelectionDefault::None),
        "all" => Some(CountrySelectionDefault::All),
        _ => None,
    }
}

/// The stock dataset files, keyed by table name.
pub fn default_datasets() -> BTreeMap<String, String> {
    [
        (DEFAULT_TITLES_TABLE, "Netflix Datasets Evaluation MS Excel.csv"),
        ("table_artists", "artists.csv"),
        ("table_tracks", "tracks.csv"),
    ]
    .into_iter()
    .map(|(table, file)| (table.to_string(), file.to_string()))
    .collect()
}

/// CLI arguments that can be used for config resolution.
/// TOML config values take precedence over these.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub source: Option<SourceKind>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub source: SourceKind,
    pub titles_table: String,
    pub datasets: BTreeMap<String, String>,

    pub columns: ColumnMapping,
    pub seasons: SeasonApproximation,
    pub aggregation: AggregationSettings,
    pub country_default: CountrySelectionDefault,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let source = match file.source {
            Some(value) => match parse_source_kind(&value) {
                Some(source) => source,
                None => bail!("Invalid source '{}': expected 'csv' or 'store'", value),
            },
            None => cli.source.unwrap_or_default(),
        };

        let titles_table = file
            .titles_table
            .unwrap_or_else(|| DEFAULT_TITLES_TABLE.to_string());
        validate_table_name(&titles_table)?;

        let datasets = file.datasets.unwrap_or_else(default_datasets);
        for table in datasets.keys() {
            validate_table_name(table)?;
        }
        if !datasets.contains_key(&titles_table) {
            bail!("Titles table '{}' has no entry in [datasets]", titles_table);
        }

        // Column mapping - each name falls back to the stock header
        let columns_file = file.columns.unwrap_or_default();
        let stock = ColumnMapping::default();
        let columns = ColumnMapping {
            id: columns_file.id.unwrap_or(stock.id),
            kind: columns_file.kind.unwrap_or(stock.kind),
            title: columns_file.title.unwrap_or(stock.title),
            country_list: columns_file.country_list.unwrap_or(stock.country_list),
            release_year: columns_file.release_year.unwrap_or(stock.release_year),
            rating: columns_file.rating.unwrap_or(stock.rating),
            duration: columns_file.duration.unwrap_or(stock.duration),
            genres: columns_file.genres.unwrap_or(stock.genres),
        };

        let norm_file = file.normalization.unwrap_or_default();
        let seasons = SeasonApproximation {
            episodes_per_season: norm_file
                .episodes_per_season
                .unwrap_or(SeasonApproximation::DEFAULT.episodes_per_season),
            minutes_per_episode: norm_file
                .minutes_per_episode
                .unwrap_or(SeasonApproximation::DEFAULT.minutes_per_episode),
        };

        let agg_file = file.aggregation.unwrap_or_default();
        let stock_agg = AggregationSettings::default();
        let aggregation = AggregationSettings {
            headline_kinds: agg_file.headline_kinds.unwrap_or(stock_agg.headline_kinds),
            top_countries_limit: agg_file
                .top_countries_limit
                .unwrap_or(stock_agg.top_countries_limit),
        };
        if aggregation.top_countries_limit == 0 {
            bail!("aggregation.top_countries_limit must be at least 1");
        }

        let country_default = match file.defaults.and_then(|d| d.country_selection) {
            Some(value) => match parse_country_default(&value) {
                Some(default) => default,
                None => bail!(
                    "Invalid defaults.country_selection '{}': expected 'none' or 'all'",
                    value
                ),
            },
            None => CountrySelectionDefault::default(),
        };

        Ok(Self {
            data_dir,
            db_path,
            source,
            titles_table,
            datasets,
            columns,
            seasons,
            aggregation,
            country_default,
        })
    }

    /// Path of the titles CSV inside the data directory.
    pub fn titles_csv_path(&self) -> PathBuf {
        let file_name = self
            .datasets
            .get(&self.titles_table)
            .map(String::as_str)
            .unwrap_or_default();
        self.data_dir.join(file_name)
    }

    pub fn titles_source(&self) -> Box<dyn RawRowSource> {
        match self.source {
            SourceKind::Csv => Box::new(CsvSource::new(self.titles_csv_path())),
            SourceKind::Store => Box::new(StoreTableSource::new(&self.db_path, &self.titles_table)),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            seasons: self.seasons,
            aggregation: self.aggregation.clone(),
        }
    }
}
