//! Admission prediction: course matching, cutoff selection, eligibility, trend analysis,
//! banding, and ranking.
//!
//! A query flows through the guard into [`PredictionEngine::predict`], which scans the catalog
//! once per requested course. The engine is pure; archiving happens in the service afterwards.

pub mod aggregate;
pub mod archive;
pub mod classifier;
mod config;
mod engine;
pub mod intake;
pub mod matcher;
pub mod router;
pub mod selector;
pub mod service;
pub mod trend;
pub mod window;

#[cfg(test)]
mod tests;

pub use aggregate::{CoursePredictions, PredictionRecord, PredictionResult, PredictionSummary};
pub use archive::{ArchiveError, ArchivedPrediction, PredictionArchive, PredictionId};
pub use classifier::{classify, AdmissionBand, Classification, RiskLabel};
pub use config::{
    CategoryPolicyKind, PredictionConfig, DEFAULT_CANONICAL_ROUNDS, DEFAULT_ELIGIBILITY_WINDOW,
    DEFAULT_TREND_LENIENCY,
};
pub use engine::{PredictionEngine, PredictionError};
pub use intake::{PredictionQuery, PredictionRequest, QueryGuard, QueryRejection};
pub use matcher::{AliasGroup, AliasTable, CourseMatcher};
pub use router::prediction_router;
pub use selector::{
    CategoryPolicy, DeclaredCategoryPolicy, OpenCategoryPolicy, SeatPreferences, SeatType,
    SelectedCutoff,
};
pub use service::{PredictionService, PredictionServiceError};
pub use trend::{TrendAnalysis, TrendAnalyzer, TrendDirection};
pub use window::EligibilityWindow;
