use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::PredictionResult;

/// Identifier wrapper for archived predictions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PredictionId(pub String);

/// A completed prediction as handed to the archive.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivedPrediction {
    pub id: PredictionId,
    pub created_at: DateTime<Utc>,
    pub result: PredictionResult,
}

/// Storage abstraction for completed predictions. Written only after the engine returns.
pub trait PredictionArchive: Send + Sync {
    fn insert(&self, prediction: ArchivedPrediction) -> Result<ArchivedPrediction, ArchiveError>;
    fn fetch(&self, id: &PredictionId) -> Result<Option<ArchivedPrediction>, ArchiveError>;
    fn recent(&self, limit: usize) -> Result<Vec<ArchivedPrediction>, ArchiveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("prediction already archived")]
    Conflict,
    #[error("prediction not found")]
    NotFound,
    #[error("archive unavailable: {0}")]
    Unavailable(String),
}
