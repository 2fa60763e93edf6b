use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use jiff::civil::Date;

use screening_core::identity::normalize;
use screening_core::models::correction::CorrectionField;
use screening_core::models::patient::PatientRecord;
use screening_instruments::config::ScoringConfig;
use screening_instruments::{Instrument, all_instruments};
use screening_storage::corrections::{FileCorrectionStore, RemoteCorrectionStore};
use screening_storage::{CorrectionStore, SourceLocation, TableSource, UpsertOutcome};

use crate::columns::CorrectionColumns;
use crate::config::{CorrectionConfig, ScreeningConfig, SourceConfig};
use crate::corrections::{CorrectionOutcome, run_corrections};
use crate::error::{CorrectionError, LoadError};
use crate::loader::load_source;
use crate::merge::merge;

/// A source left out of a refresh, and why.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: String,
}

/// One refresh result. Shared read-only with every reader.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Arc<Vec<PatientRecord>>,
    pub refreshed_at: jiff::Timestamp,
    pub skipped: Vec<SkippedSource>,
    pub corrections: CorrectionOutcome,
}

impl Snapshot {
    /// Select a record by exact full name.
    pub fn patient(&self, full_name: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.full_name() == full_name)
    }
}

struct CorrectionChannel {
    store: Box<dyn CorrectionStore>,
    columns: CorrectionColumns,
    field: CorrectionField,
}

/// fetch → normalize → score → merge → correct, built once from config.
pub struct Pipeline {
    sources: Vec<(SourceConfig, Box<dyn TableSource>)>,
    corrections: Option<CorrectionChannel>,
    scoring: ScoringConfig,
    instruments: Vec<Box<dyn Instrument>>,
}

impl Pipeline {
    pub fn new(scoring: ScoringConfig) -> Self {
        let instruments = all_instruments(&scoring);
        Self {
            sources: Vec::new(),
            corrections: None,
            scoring,
            instruments,
        }
    }

    pub fn from_config(config: &ScreeningConfig) -> Self {
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        let mut pipeline = Self::new(config.scoring.clone());
        for source in &config.sources {
            let table_source = source.location.open(timeout);
            pipeline = pipeline.with_source(source.clone(), table_source);
        }
        if let Some(corrections) = &config.corrections {
            let store = open_correction_store(corrections, timeout);
            pipeline = pipeline.with_corrections(store, corrections.columns.clone(), corrections.field);
        }
        pipeline
    }

    pub fn with_source(mut self, config: SourceConfig, source: Box<dyn TableSource>) -> Self {
        self.sources.push((config, source));
        self
    }

    pub fn with_corrections(
        mut self,
        store: Box<dyn CorrectionStore>,
        columns: CorrectionColumns,
        field: CorrectionField,
    ) -> Self {
        self.corrections = Some(CorrectionChannel {
            store,
            columns,
            field,
        });
        self
    }

    pub fn instruments(&self) -> &[Box<dyn Instrument>] {
        &self.instruments
    }

    /// Run the whole refresh with ages computed on `today`. Never fails: a
    /// source that cannot be loaded is skipped and recorded in the snapshot.
    pub fn run(&self, today: Date) -> Snapshot {
        let mut fragments = Vec::with_capacity(self.sources.len());
        let mut skipped = Vec::new();

        for (config, source) in &self.sources {
            match load_source(config, source.as_ref(), &self.instruments, today) {
                Ok(fragment) => fragments.push(fragment),
                Err(e) => {
                    tracing::warn!(source = %config.id, error = %e, "source skipped");
                    let source_id = match &e {
                        LoadError::Fetch { source_id, .. }
                        | LoadError::MissingIdentityColumn { source_id, .. } => source_id.clone(),
                    };
                    skipped.push(SkippedSource {
                        source_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut records = merge(fragments);

        let corrections = match &self.corrections {
            Some(channel) => run_corrections(
                &mut records,
                channel.store.as_ref(),
                &channel.columns,
                channel.field,
                &self.scoring,
                &self.instruments,
            ),
            None => CorrectionOutcome::NotConfigured,
        };

        if records.is_empty() {
            tracing::info!("refresh produced no patients");
        }

        Snapshot {
            records: Arc::new(records),
            refreshed_at: jiff::Timestamp::now(),
            skipped,
            corrections,
        }
    }

    /// Write one correction through the store. The name and date must form a
    /// valid identity; the date is stored in its `DD.MM.YYYY` display form.
    pub fn write_correction(
        &self,
        full_name: &str,
        date_of_birth: &str,
        value: f64,
    ) -> Result<UpsertOutcome, CorrectionError> {
        let channel = self
            .corrections
            .as_ref()
            .ok_or(CorrectionError::NotConfigured)?;
        if !value.is_finite() {
            return Err(CorrectionError::InvalidValue);
        }
        let identity = normalize(full_name, date_of_birth)?;
        let outcome = channel.store.upsert(
            &identity.full_name,
            &identity.display_date_of_birth(),
            value,
        )?;
        Ok(outcome)
    }
}

fn open_correction_store(config: &CorrectionConfig, timeout: Duration) -> Box<dyn CorrectionStore> {
    match &config.location {
        SourceLocation::Path(path) => {
            Box::new(FileCorrectionStore::new(path.clone(), config.layout.clone()))
        }
        SourceLocation::Url(_) => Box::new(RemoteCorrectionStore::new(config.location.open(timeout))),
    }
}

struct CachedSnapshot {
    taken: Instant,
    snapshot: Arc<Snapshot>,
}

/// The cached "current reconciled dataset".
///
/// A snapshot is served until it is older than the TTL or a correction is
/// written. The cache lock is held across a refresh, so refreshes never run
/// concurrently.
pub struct Dataset {
    pipeline: Pipeline,
    ttl: Duration,
    cache: Mutex<Option<CachedSnapshot>>,
}

impl Dataset {
    pub fn new(pipeline: Pipeline, ttl: Duration) -> Self {
        Self {
            pipeline,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self::new(
            Pipeline::from_config(config),
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn current(&self) -> Arc<Snapshot> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref().filter(|c| c.taken.elapsed() < self.ttl) {
            return Arc::clone(&cached.snapshot);
        }
        self.refresh_locked(&mut cache)
    }

    /// Refresh now, regardless of the cached snapshot's age.
    pub fn refresh(&self) -> Arc<Snapshot> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        self.refresh_locked(&mut cache)
    }

    pub fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn patient(&self, full_name: &str) -> Option<PatientRecord> {
        self.current().patient(full_name).cloned()
    }

    /// Write a correction and drop the cached snapshot so the next read sees it.
    pub fn record_correction(
        &self,
        full_name: &str,
        date_of_birth: &str,
        value: f64,
    ) -> Result<UpsertOutcome, CorrectionError> {
        let outcome = self
            .pipeline
            .write_correction(full_name, date_of_birth, value)?;
        self.invalidate();
        tracing::info!(patient = %full_name.trim(), ?outcome, "correction recorded");
        Ok(outcome)
    }

    fn refresh_locked(&self, cache: &mut Option<CachedSnapshot>) -> Arc<Snapshot> {
        let started = Instant::now();
        let today = jiff::Zoned::now().date();
        let snapshot = Arc::new(self.pipeline.run(today));
        tracing::info!(
            patients = snapshot.records.len(),
            skipped = snapshot.skipped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset refreshed"
        );
        *cache = Some(CachedSnapshot {
            taken: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        snapshot
    }
}
