use super::schema::{quote_identifier, validate_table_name, IMPORTS_TABLE};
use crate::catalog::{read_csv, LoadError, RawTable};
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, types::ValueRef, Connection, OpenFlags};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One row of the import log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportLogEntry {
    pub table_name: String,
    pub source: String,
    pub row_count: usize,
    pub imported_at: i64,
}

/// Outcome of importing a set of datasets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// (table name, imported rows) in import order.
    pub imported: Vec<(String, usize)>,
    /// Dataset files that were not found.
    pub missing: Vec<PathBuf>,
}

/// SQLite database holding one table per imported dataset.
pub struct SqliteTableStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteTableStore {
    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open table store {}", path.display()))?;
        IMPORTS_TABLE.create_if_missing(&conn)?;
        Ok(Self { conn, path })
    }

    /// Opens an existing store without write access, for loading.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces `table` with the content of the CSV file at `csv_path`.
    pub fn import_csv(&mut self, table: &str, csv_path: &Path) -> Result<usize> {
        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open {}", csv_path.display()))?;
        let raw = read_csv(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to read CSV {}", csv_path.display()))?;
        self.import_raw(table, &raw, &csv_path.display().to_string())
    }

    /// Replaces `table` with `raw`, one TEXT column per raw column, inside a
    /// single transaction. Returns the number of imported rows.
    pub fn import_raw(&mut self, table: &str, raw: &RawTable, source: &str) -> Result<usize> {
        validate_table_name(table)?;
        if raw.columns.is_empty() {
            bail!("Cannot import '{}' from {}: no columns", table, source);
        }
        let columns = unique_column_names(&raw.columns);

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", table), params![])?;
        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("{} TEXT", quote_identifier(c)))
            .collect();
        tx.execute(
            &format!("CREATE TABLE {} ({})", table, column_defs.join(", ")),
            params![],
        )?;

        {
            let placeholders = vec!["?"; columns.len()].join(", ");
            let mut stmt =
                tx.prepare(&format!("INSERT INTO {} VALUES ({})", table, placeholders))?;
            for row in &raw.rows {
                let values = (0..columns.len()).map(|i| row.get(i).cloned().flatten());
                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.execute(
            "INSERT INTO _imports (table_name, source, row_count) VALUES (?1, ?2, ?3)",
            params![table, source, raw.len() as i64],
        )?;
        tx.commit()?;

        info!("Imported {} rows into table '{}'", raw.len(), table);
        Ok(raw.len())
    }

    /// Imports every dataset of `datasets` (table name -> file name) found in
    /// `data_dir`. Missing files are reported and skipped.
    pub fn import_datasets(
        &mut self,
        data_dir: &Path,
        datasets: &BTreeMap<String, String>,
    ) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for (table, file_name) in datasets {
            let csv_path = data_dir.join(file_name);
            if !csv_path.exists() {
                warn!(
                    "Dataset file missing in {}: {}",
                    data_dir.display(),
                    file_name
                );
                report.missing.push(csv_path);
                continue;
            }
            info!("Importing {} -> table '{}'", file_name, table);
            let rows = self.import_csv(table, &csv_path)?;
            report.imported.push((table.clone(), rows));
        }
        Ok(report)
    }

    pub fn table_exists(&self, table: &str) -> Result<bool, rusqlite::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Reads `table` back in insertion order.
    pub fn read_table(&self, table: &str) -> Result<RawTable, LoadError> {
        if validate_table_name(table).is_err() || !self.table_exists(table)? {
            return Err(LoadError::MissingTable(table.to_string()));
        }

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", table))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let rows = stmt
            .query_map(params![], |row| {
                (0..column_count)
                    .map(|i| row.get_ref(i).map(value_to_text))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawTable { columns, rows })
    }

    /// The import log, oldest first.
    pub fn imports(&self) -> Result<Vec<ImportLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name, source, row_count, imported_at FROM _imports ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![], |row| {
                Ok(ImportLogEntry {
                    table_name: row.get(0)?,
                    source: row.get(1)?,
                    row_count: row.get::<_, i64>(2)? as usize,
                    imported_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => None,
    }
}

/// Names SQLite resolves to the implicit row id unless a column shadows them.
const ROWID_ALIASES: [&str; 3] = ["rowid", "oid", "_rowid_"];

/// SQLite rejects duplicate column names; repeated or blank CSV headers get a
/// positional suffix. Row id aliases are suffixed too, so `ORDER BY rowid`
/// keeps meaning insertion order.
fn unique_column_names(columns: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = ROWID_ALIASES.iter().map(|a| a.to_string()).collect();
    columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let base = if name.trim().is_empty() {
                format!("column_{}", index + 1)
            } else {
                name.clone()
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.to_lowercase()) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}
