use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::table::Table;

/// Where a table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    /// CSV export endpoint, fetched with a GET.
    Url(String),
    /// Local CSV file.
    Path(PathBuf),
}

impl SourceLocation {
    pub fn open(&self, timeout: Duration) -> Box<dyn TableSource> {
        match self {
            SourceLocation::Url(url) => Box::new(HttpCsvSource::new(url.clone(), timeout)),
            SourceLocation::Path(path) => Box::new(FileCsvSource::new(path.clone())),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A pull-only provider of one raw table.
pub trait TableSource: Send + Sync {
    /// Where the table lives, for logs and error messages.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Table, StorageError>;
}

impl<T: TableSource + ?Sized> TableSource for Arc<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Table, StorageError> {
        (**self).fetch()
    }
}

pub struct HttpCsvSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl TableSource for HttpCsvSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Table, StorageError> {
        let fetch_error = |e: ureq::Error| StorageError::Fetch {
            url: self.url.clone(),
            message: e.to_string(),
        };

        let body = self
            .agent
            .get(&self.url)
            .call()
            .map_err(fetch_error)?
            .body_mut()
            .read_to_string()
            .map_err(fetch_error)?;

        let table = Table::from_csv_str(&body)?;
        tracing::debug!(url = %self.url, rows = table.len(), "fetched remote table");
        Ok(table)
    }
}

pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileCsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Table, StorageError> {
        let text =
            std::fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Table::from_csv_str(&text)
    }
}

/// In-process table, replaceable at runtime. Used by tests and by callers
/// that already hold the data.
pub struct MemorySource {
    name: String,
    table: RwLock<Table>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table: RwLock::new(table),
        }
    }

    pub fn replace(&self, table: Table) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
    }
}

impl TableSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }

    fn fetch(&self) -> Result<Table, StorageError> {
        Ok(self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
