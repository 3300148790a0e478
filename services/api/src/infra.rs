use crate::demo::sample_catalog;
use cutoff_compass::catalog::InMemoryCatalog;
use cutoff_compass::config::{AppConfig, CatalogConfig};
use cutoff_compass::error::AppError;
use cutoff_compass::prediction::{
    AliasTable, ArchiveError, ArchivedPrediction, PredictionArchive, PredictionEngine,
    PredictionId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPredictionArchive {
    records: Arc<Mutex<HashMap<PredictionId, ArchivedPrediction>>>,
}

fn poisoned() -> ArchiveError {
    ArchiveError::Unavailable("archive mutex poisoned".to_string())
}

impl PredictionArchive for InMemoryPredictionArchive {
    fn insert(&self, prediction: ArchivedPrediction) -> Result<ArchivedPrediction, ArchiveError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        if guard.contains_key(&prediction.id) {
            return Err(ArchiveError::Conflict);
        }
        guard.insert(prediction.id.clone(), prediction.clone());
        Ok(prediction)
    }

    fn fetch(&self, id: &PredictionId) -> Result<Option<ArchivedPrediction>, ArchiveError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ArchivedPrediction>, ArchiveError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        let mut records: Vec<ArchivedPrediction> = guard.values().cloned().collect();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogSource {
    Snapshot(PathBuf),
    Sample,
}

impl CatalogSource {
    pub(crate) fn describe(&self) -> String {
        match self {
            CatalogSource::Snapshot(path) => format!("snapshot {}", path.display()),
            CatalogSource::Sample => "built-in sample catalog".to_string(),
        }
    }
}

/// Loads the configured snapshot, or the sample catalog when none is configured.
pub(crate) fn load_catalog(
    config: &CatalogConfig,
) -> Result<(InMemoryCatalog, CatalogSource), AppError> {
    match &config.snapshot_path {
        Some(path) => {
            let catalog = InMemoryCatalog::from_path(path)?;
            info!(
                path = %path.display(),
                institutions = catalog.len(),
                offerings = catalog.course_count(),
                "catalog snapshot loaded"
            );
            Ok((catalog, CatalogSource::Snapshot(path.clone())))
        }
        None => {
            warn!("CATALOG_PATH not set; serving the built-in sample catalog");
            Ok((sample_catalog()?, CatalogSource::Sample))
        }
    }
}

pub(crate) fn load_alias_table(config: &CatalogConfig) -> Result<AliasTable, AppError> {
    match &config.alias_table_path {
        Some(path) => {
            let table = AliasTable::from_path(path)?;
            info!(
                path = %path.display(),
                version = table.version,
                groups = table.groups.len(),
                "alias table override loaded"
            );
            Ok(table)
        }
        None => Ok(AliasTable::builtin()),
    }
}

pub(crate) fn build_engine(config: &AppConfig) -> Result<PredictionEngine, AppError> {
    let aliases = load_alias_table(&config.catalog)?;
    Ok(PredictionEngine::with_aliases(
        config.prediction.clone(),
        &aliases,
    ))
}

pub(crate) fn parse_percentile(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a percentile ({err})"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("percentile must be between 0 and 100 (found {value})"));
    }
    Ok(value)
}
