use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{
    CategoryCutoffs, CourseOffering, Cutoff, FeeSummary, InMemoryCatalog, Institution,
    OwnershipType, PlacementSummary, Round,
};
use crate::prediction::{
    prediction_router, ArchiveError, ArchivedPrediction, PredictionArchive, PredictionEngine,
    PredictionId, PredictionRequest, PredictionService,
};

pub(super) fn rounds(values: &[(u8, f64)]) -> Vec<Round> {
    values
        .iter()
        .map(|(number, value)| Round {
            number: *number,
            cutoff: Cutoff::general(*value),
        })
        .collect()
}

pub(super) fn offering(name: &str, values: &[(u8, f64)]) -> CourseOffering {
    CourseOffering {
        name: name.to_string(),
        seats: Some(60),
        rounds: rounds(values),
        cutoff: values.first().map(|(_, value)| Cutoff::general(*value)),
    }
}

pub(super) fn institution(
    name: &str,
    ownership: OwnershipType,
    courses: Vec<CourseOffering>,
) -> Institution {
    Institution {
        name: name.to_string(),
        city: "Pune".to_string(),
        ownership,
        fees: FeeSummary {
            annual_fee: Some(135_000),
        },
        placement: PlacementSummary {
            average_package_lpa: Some(7.5),
            highest_package_lpa: Some(32.0),
            placement_rate: Some(88.0),
        },
        cutoff: None,
        courses,
    }
}

pub(super) fn catalog(institutions: Vec<Institution>) -> InMemoryCatalog {
    InMemoryCatalog::new(institutions).expect("unique institution names")
}

/// Cutoff for one round carrying open, TFWS, and ladies columns.
pub(super) fn mixed_cutoff(general: f64, tfws: Option<f64>, ladies: Option<f64>) -> Cutoff {
    Cutoff {
        open: CategoryCutoffs {
            general: Some(general),
            ..CategoryCutoffs::default()
        },
        tfws,
        ladies: CategoryCutoffs {
            general: ladies,
            ..CategoryCutoffs::default()
        },
    }
}

/// Three computer engineering offerings inside the window of a 97.0 candidate plus one
/// mechanical offering outside it.
pub(super) fn pune_catalog() -> InMemoryCatalog {
    catalog(vec![
        institution(
            "Deccan Institute of Technology",
            OwnershipType::Autonomous,
            vec![
                offering("Computer Engineering", &[(1, 99.0), (2, 98.5), (3, 98.0), (4, 97.0)]),
                offering("Mechanical Engineering", &[(1, 92.0), (2, 91.0)]),
            ],
        ),
        institution(
            "Sahyadri College of Engineering",
            OwnershipType::Private,
            vec![offering(
                "Computer Science and Engineering",
                &[(1, 97.5), (2, 97.2)],
            )],
        ),
        institution(
            "Government College of Engineering Karad",
            OwnershipType::Government,
            vec![offering("Computer Engineering", &[(1, 98.2)])],
        ),
    ])
}

pub(super) fn request(percentile: f64, courses: &[&str]) -> PredictionRequest {
    PredictionRequest {
        percentile: Some(percentile),
        category: Some("general".to_string()),
        courses: courses.iter().map(|course| course.to_string()).collect(),
        ..PredictionRequest::default()
    }
}

pub(super) fn build_service() -> (
    PredictionService<InMemoryCatalog, MemoryArchive>,
    Arc<MemoryArchive>,
) {
    let archive = Arc::new(MemoryArchive::default());
    let service = PredictionService::new(
        Arc::new(pune_catalog()),
        archive.clone(),
        PredictionEngine::default(),
    );
    (service, archive)
}

pub(super) fn prediction_router_with_service(
    service: PredictionService<InMemoryCatalog, MemoryArchive>,
) -> axum::Router {
    prediction_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryArchive {
    records: Arc<Mutex<HashMap<PredictionId, ArchivedPrediction>>>,
}

impl MemoryArchive {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("archive mutex poisoned").len()
    }
}

impl PredictionArchive for MemoryArchive {
    fn insert(&self, prediction: ArchivedPrediction) -> Result<ArchivedPrediction, ArchiveError> {
        let mut guard = self.records.lock().expect("archive mutex poisoned");
        if guard.contains_key(&prediction.id) {
            return Err(ArchiveError::Conflict);
        }
        guard.insert(prediction.id.clone(), prediction.clone());
        Ok(prediction)
    }

    fn fetch(&self, id: &PredictionId) -> Result<Option<ArchivedPrediction>, ArchiveError> {
        let guard = self.records.lock().expect("archive mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ArchivedPrediction>, ArchiveError> {
        let guard = self.records.lock().expect("archive mutex poisoned");
        let mut records: Vec<ArchivedPrediction> = guard.values().cloned().collect();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

pub(super) struct UnavailableArchive;

impl PredictionArchive for UnavailableArchive {
    fn insert(&self, _prediction: ArchivedPrediction) -> Result<ArchivedPrediction, ArchiveError> {
        Err(ArchiveError::Unavailable("archive offline".to_string()))
    }

    fn fetch(&self, _id: &PredictionId) -> Result<Option<ArchivedPrediction>, ArchiveError> {
        Err(ArchiveError::Unavailable("archive offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<ArchivedPrediction>, ArchiveError> {
        Err(ArchiveError::Unavailable("archive offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
