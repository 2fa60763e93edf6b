pub mod corrections;
pub mod health;
pub mod instruments;
pub mod patients;
pub mod reports;

use std::sync::Arc;

use screening_reconcile::Dataset;
use screening_reconcile::dataset::Snapshot;

use crate::error::ApiError;

/// Read the current snapshot off the async runtime; a stale cache triggers a
/// blocking refresh.
pub(crate) async fn current_snapshot(dataset: Arc<Dataset>) -> Result<Arc<Snapshot>, ApiError> {
    Ok(tokio::task::spawn_blocking(move || dataset.current()).await?)
}
