//! screening-storage
//!
//! Tabular I/O. Pulls CSV tables over HTTP or from disk, and reads and writes
//! the correction table.

pub mod corrections;
pub mod error;
pub mod source;
pub mod table;

pub use corrections::{CorrectionLayout, CorrectionStore, UpsertOutcome};
pub use error::StorageError;
pub use source::{SourceLocation, TableSource};
pub use table::Table;
