use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::source::TableSource;
use crate::table::Table;

/// Headers of the correction table. A new store is created with exactly
/// these three columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionLayout {
    pub name_header: String,
    pub dob_header: String,
    pub value_header: String,
}

impl Default for CorrectionLayout {
    fn default() -> Self {
        Self {
            name_header: "ПІБ".to_string(),
            dob_header: "Дата народження".to_string(),
            value_header: "Холестерин".to_string(),
        }
    }
}

impl CorrectionLayout {
    pub fn empty_table(&self) -> Table {
        Table::new(vec![
            self.name_header.clone(),
            self.dob_header.clone(),
            self.value_header.clone(),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing row (0-based data row index) had its value replaced.
    Updated { row: usize },
    Appended,
}

/// Read and write access to the correction table.
pub trait CorrectionStore: Send + Sync {
    fn describe(&self) -> String;

    fn load(&self) -> Result<Table, StorageError>;

    /// Set the value for `(name, dob)`: update the matching row or append one.
    fn upsert(&self, name: &str, dob: &str, value: f64) -> Result<UpsertOutcome, StorageError>;
}

/// Find-and-update on a loaded correction table.
///
/// A row matches when its trimmed, lowercased name equals the trimmed,
/// lowercased `name` and its trimmed date string equals the trimmed `dob`.
/// The date is compared as text, in the display form the caller writes.
pub fn upsert_row(
    table: &mut Table,
    layout: &CorrectionLayout,
    name: &str,
    dob: &str,
    value: f64,
) -> Result<UpsertOutcome, StorageError> {
    let missing = |column: &str| StorageError::MissingColumn {
        column: column.to_string(),
    };
    let name_col = table
        .column(&layout.name_header)
        .ok_or_else(|| missing(&layout.name_header))?;
    let dob_col = table
        .column(&layout.dob_header)
        .ok_or_else(|| missing(&layout.dob_header))?;
    let value_col = table
        .column(&layout.value_header)
        .ok_or_else(|| missing(&layout.value_header))?;

    let target_name = name.trim().to_lowercase();
    let target_dob = dob.trim();
    let value_text = value.to_string();

    let found = (0..table.len()).find(|&row| {
        let row_name = table.cell(row, name_col).unwrap_or("").trim().to_lowercase();
        let row_dob = table.cell(row, dob_col).unwrap_or("").trim();
        row_name == target_name && row_dob == target_dob
    });

    match found {
        Some(row) => {
            let cells = &mut table.rows[row];
            if cells.len() <= value_col {
                cells.resize(value_col + 1, String::new());
            }
            cells[value_col] = value_text;
            Ok(UpsertOutcome::Updated { row })
        }
        None => {
            let mut cells = vec![String::new(); table.headers.len()];
            cells[name_col] = name.trim().to_string();
            cells[dob_col] = target_dob.to_string();
            cells[value_col] = value_text;
            table.rows.push(cells);
            Ok(UpsertOutcome::Appended)
        }
    }
}

/// Correction table kept in a local CSV file. Writes go to a temp file that
/// is renamed over the original.
pub struct FileCorrectionStore {
    path: PathBuf,
    layout: CorrectionLayout,
    write_lock: Mutex<()>,
}

impl FileCorrectionStore {
    pub fn new(path: impl Into<PathBuf>, layout: CorrectionLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, table: &Table) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }

        let bytes = table.to_csv_bytes()?;
        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        std::fs::write(&tmp_path, bytes).map_err(|e| StorageError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

impl CorrectionStore for FileCorrectionStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    /// A missing file is an empty store.
    fn load(&self) -> Result<Table, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Table::from_csv_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(self.layout.empty_table()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn upsert(&self, name: &str, dob: &str, value: f64) -> Result<UpsertOutcome, StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = self.load()?;
        if table.headers.is_empty() {
            table = self.layout.empty_table();
        }
        let outcome = upsert_row(&mut table, &self.layout, name, dob, value)?;
        self.write(&table)?;

        tracing::info!(store = %self.path.display(), ?outcome, "correction written");
        Ok(outcome)
    }
}

/// Correction table published at a remote CSV endpoint. Readable only.
pub struct RemoteCorrectionStore {
    source: Box<dyn TableSource>,
}

impl RemoteCorrectionStore {
    pub fn new(source: Box<dyn TableSource>) -> Self {
        Self { source }
    }
}

impl CorrectionStore for RemoteCorrectionStore {
    fn describe(&self) -> String {
        self.source.describe()
    }

    fn load(&self) -> Result<Table, StorageError> {
        self.source.fetch()
    }

    fn upsert(&self, _name: &str, _dob: &str, _value: f64) -> Result<UpsertOutcome, StorageError> {
        Err(StorageError::ReadOnly {
            store: self.source.describe(),
        })
    }
}

/// Correction table held in memory.
pub struct MemoryCorrectionStore {
    layout: CorrectionLayout,
    table: Mutex<Table>,
}

impl MemoryCorrectionStore {
    pub fn new(layout: CorrectionLayout) -> Self {
        let table = layout.empty_table();
        Self {
            layout,
            table: Mutex::new(table),
        }
    }

    pub fn with_table(layout: CorrectionLayout, table: Table) -> Self {
        Self {
            layout,
            table: Mutex::new(table),
        }
    }
}

impl CorrectionStore for MemoryCorrectionStore {
    fn describe(&self) -> String {
        "memory:corrections".to_string()
    }

    fn load(&self) -> Result<Table, StorageError> {
        Ok(self.table.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn upsert(&self, name: &str, dob: &str, value: f64) -> Result<UpsertOutcome, StorageError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        upsert_row(&mut table, &self.layout, name, dob, value)
    }
}
