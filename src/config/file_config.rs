use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub data_dir: Option<String>,
    pub db_path: Option<String>,
    pub source: Option<String>,
    pub titles_table: Option<String>,

    /// Table name -> CSV file name inside `data_dir`.
    pub datasets: Option<BTreeMap<String, String>>,

    // Pipeline configs
    pub columns: Option<ColumnsConfig>,
    pub normalization: Option<NormalizationConfig>,
    pub aggregation: Option<AggregationConfig>,
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ColumnsConfig {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub country_list: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub genres: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NormalizationConfig {
    pub episodes_per_season: Option<u32>,
    pub minutes_per_episode: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AggregationConfig {
    pub headline_kinds: Option<Vec<String>>,
    pub top_countries_limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    /// "none" or "all"
    pub country_selection: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
