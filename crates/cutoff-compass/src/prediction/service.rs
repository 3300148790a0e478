use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::archive::{ArchiveError, ArchivedPrediction, PredictionArchive, PredictionId};
use super::engine::{PredictionEngine, PredictionError};
use super::intake::{PredictionRequest, QueryGuard, QueryRejection};
use crate::catalog::CatalogStore;

/// Service composing the query guard, catalog, engine, and archive.
pub struct PredictionService<C, A> {
    guard: Arc<QueryGuard>,
    catalog: Arc<C>,
    archive: Arc<A>,
    engine: Arc<PredictionEngine>,
}

static PREDICTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_prediction_id() -> PredictionId {
    let id = PREDICTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PredictionId(format!("pred-{id:06}"))
}

impl<C, A> PredictionService<C, A>
where
    C: CatalogStore + 'static,
    A: PredictionArchive + 'static,
{
    pub fn new(catalog: Arc<C>, archive: Arc<A>, engine: PredictionEngine) -> Self {
        Self::with_guard(QueryGuard::default(), catalog, archive, engine)
    }

    pub fn with_guard(
        guard: QueryGuard,
        catalog: Arc<C>,
        archive: Arc<A>,
        engine: PredictionEngine,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            catalog,
            archive,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Validate, predict, and archive a request.
    pub fn predict(
        &self,
        request: PredictionRequest,
    ) -> Result<ArchivedPrediction, PredictionServiceError> {
        let query = self.guard.query_from_request(request)?;
        let result = self.engine.predict(self.catalog.as_ref(), &query)?;

        let summary = result.summary;
        let archived = self.archive.insert(ArchivedPrediction {
            id: next_prediction_id(),
            created_at: Utc::now(),
            result,
        })?;

        info!(
            prediction_id = %archived.id.0,
            percentile = query.percentile,
            courses = query.courses.len(),
            total = summary.total,
            high = summary.high,
            "prediction archived"
        );

        Ok(archived)
    }

    /// Most recently archived predictions, newest first.
    pub fn recent(
        &self,
        limit: usize,
    ) -> Result<Vec<ArchivedPrediction>, PredictionServiceError> {
        Ok(self.archive.recent(limit)?)
    }

    /// Fetch an archived prediction for API responses.
    pub fn get(&self, id: &PredictionId) -> Result<ArchivedPrediction, PredictionServiceError> {
        let prediction = self.archive.fetch(id)?.ok_or(ArchiveError::NotFound)?;
        Ok(prediction)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Rejected(#[from] QueryRejection),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
