use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::archive::{ArchiveError, PredictionArchive, PredictionId};
use super::engine::PredictionError;
use super::intake::PredictionRequest;
use super::service::{PredictionService, PredictionServiceError};
use crate::catalog::CatalogStore;

/// Size of the listing served by `GET /api/v1/predictions`.
pub const RECENT_PREDICTIONS_LIMIT: usize = 20;

/// Router builder exposing the prediction endpoints.
pub fn prediction_router<C, A>(service: Arc<PredictionService<C, A>>) -> Router
where
    C: CatalogStore + 'static,
    A: PredictionArchive + 'static,
{
    Router::new()
        .route(
            "/api/v1/predictions",
            post(predict_handler::<C, A>).get(recent_handler::<C, A>),
        )
        .route(
            "/api/v1/predictions/:prediction_id",
            get(fetch_handler::<C, A>),
        )
        .with_state(service)
}

pub(crate) async fn predict_handler<C, A>(
    State(service): State<Arc<PredictionService<C, A>>>,
    axum::Json(request): axum::Json<PredictionRequest>,
) -> Response
where
    C: CatalogStore + 'static,
    A: PredictionArchive + 'static,
{
    match service.predict(request) {
        Ok(archived) => (StatusCode::CREATED, axum::Json(archived)).into_response(),
        Err(PredictionServiceError::Rejected(rejection)) => {
            let payload = json!({
                "error": rejection.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PredictionServiceError::Prediction(error)) => {
            let PredictionError::NoEligibleColleges {
                window_low,
                window_high,
                ..
            } = &error;
            let payload = json!({
                "error": error.to_string(),
                "window": { "low": window_low, "high": window_high },
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fetch_handler<C, A>(
    State(service): State<Arc<PredictionService<C, A>>>,
    Path(prediction_id): Path<String>,
) -> Response
where
    C: CatalogStore + 'static,
    A: PredictionArchive + 'static,
{
    let id = PredictionId(prediction_id);
    match service.get(&id) {
        Ok(archived) => (StatusCode::OK, axum::Json(archived)).into_response(),
        Err(PredictionServiceError::Archive(ArchiveError::NotFound)) => {
            let payload = json!({
                "prediction_id": id.0,
                "error": "prediction not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn recent_handler<C, A>(
    State(service): State<Arc<PredictionService<C, A>>>,
) -> Response
where
    C: CatalogStore + 'static,
    A: PredictionArchive + 'static,
{
    match service.recent(RECENT_PREDICTIONS_LIMIT) {
        Ok(predictions) => (StatusCode::OK, axum::Json(predictions)).into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
