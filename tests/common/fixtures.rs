//! Scratch data directories for tests.

use super::constants::*;
use anyhow::Result;
use catalog_insights::config::{AppConfig, CliConfig, SourceKind};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory holding `data_csv/` and the path for a store.
pub struct TestData {
    // Keeps the directory alive for the duration of the test
    #[allow(dead_code)]
    pub dir: TempDir,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

/// Writes the titles and artists CSVs. The tracks dataset is left out on
/// purpose so imports report it as missing.
pub fn write_data_dir() -> Result<TestData> {
    let dir = TempDir::new()?;
    let data_dir = dir.path().join("data_csv");
    fs::create_dir_all(&data_dir)?;
    fs::write(data_dir.join(TITLES_FILE), TITLES_CSV)?;
    fs::write(data_dir.join(ARTISTS_FILE), ARTISTS_CSV)?;
    let db_path = dir.path().join("data").join("catalog.db");
    Ok(TestData {
        dir,
        data_dir,
        db_path,
    })
}

/// Stock configuration pointed at `data`.
pub fn stock_config(data: &TestData, source: SourceKind) -> AppConfig {
    let cli = CliConfig {
        data_dir: Some(data.data_dir.clone()),
        db_path: Some(data.db_path.clone()),
        source: Some(source),
    };
    AppConfig::resolve(&cli, None).unwrap()
}
