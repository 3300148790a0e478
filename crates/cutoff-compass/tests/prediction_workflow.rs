//! End-to-end prediction scenarios driven through a JSON catalog snapshot, the public service
//! facade, and the HTTP router.

mod common {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use cutoff_compass::catalog::InMemoryCatalog;
    use cutoff_compass::prediction::{
        ArchiveError, ArchivedPrediction, PredictionArchive, PredictionEngine, PredictionId,
        PredictionRequest, PredictionService,
    };

    pub(super) const SNAPSHOT: &str = r#"{
        "version": 2,
        "institutions": [
            {
                "name": "College of Engineering Pune",
                "city": "Pune",
                "ownership": "Government",
                "fees": { "annual_fee": 98000 },
                "placement": { "average_package_lpa": 9.1, "placement_rate": 91.0 },
                "courses": [
                    {
                        "name": "Computer Engineering",
                        "seats": 120,
                        "rounds": [
                            { "number": 3, "cutoff": { "general": 99.2, "tfws": 99.6 } },
                            { "number": 1, "cutoff": { "general": 99.7, "tfws": 99.9 } },
                            { "number": 2, "cutoff": { "general": 99.4 } }
                        ]
                    },
                    {
                        "name": "Electronics & Telecommunication Engineering",
                        "seats": 60,
                        "rounds": [
                            { "number": 1, "cutoff": { "general": 98.1 } },
                            { "number": 2, "cutoff": { "general": 97.6 } }
                        ]
                    }
                ]
            },
            {
                "name": "Pimpri Chinchwad College of Engineering",
                "city": "Pimpri",
                "ownership": "Autonomous",
                "courses": [
                    {
                        "name": "Computer Science and Engineering (AI & ML)",
                        "seats": 60,
                        "rounds": [
                            { "number": 1, "cutoff": { "general": 97.9, "ladies": { "general": 97.1 } } },
                            { "number": 2, "cutoff": { "general": 98.3 } }
                        ]
                    }
                ]
            },
            {
                "name": "Rajarambapu Institute of Technology",
                "city": "Islampur",
                "ownership": "Private",
                "cutoff": { "general": 91.2 },
                "courses": [
                    { "name": "Mechanical Engineering", "seats": 60 },
                    { "name": "Information Technology", "rounds": [], "cutoff": { "general": 140.0 } }
                ]
            }
        ]
    }"#;

    pub(super) fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot decodes")
    }

    pub(super) fn request(percentile: f64, courses: &[&str]) -> PredictionRequest {
        PredictionRequest {
            percentile: Some(percentile),
            category: Some("open".to_string()),
            courses: courses.iter().map(|course| course.to_string()).collect(),
            ..PredictionRequest::default()
        }
    }

    pub(super) fn service() -> PredictionService<InMemoryCatalog, MemoryArchive> {
        PredictionService::new(
            Arc::new(catalog()),
            Arc::new(MemoryArchive::default()),
            PredictionEngine::default(),
        )
    }

    #[derive(Default)]
    pub(super) struct MemoryArchive {
        records: Mutex<HashMap<PredictionId, ArchivedPrediction>>,
    }

    impl PredictionArchive for MemoryArchive {
        fn insert(
            &self,
            prediction: ArchivedPrediction,
        ) -> Result<ArchivedPrediction, ArchiveError> {
            let mut guard = self.records.lock().expect("archive mutex poisoned");
            guard.insert(prediction.id.clone(), prediction.clone());
            Ok(prediction)
        }

        fn fetch(&self, id: &PredictionId) -> Result<Option<ArchivedPrediction>, ArchiveError> {
            let guard = self.records.lock().expect("archive mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn recent(&self, limit: usize) -> Result<Vec<ArchivedPrediction>, ArchiveError> {
            let guard = self.records.lock().expect("archive mutex poisoned");
            Ok(guard.values().take(limit).cloned().collect())
        }
    }
}

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use cutoff_compass::catalog::{CatalogError, CatalogStore, Category, InMemoryCatalog};
use cutoff_compass::prediction::{
    prediction_router, AdmissionBand, PredictionEngine, PredictionQuery, SeatType,
};
use tower::ServiceExt;

#[test]
fn rounds_are_analyzed_in_round_order() {
    let catalog = catalog();
    let query = PredictionQuery::new(
        97.0,
        Category::General,
        vec!["Computer Engineering".to_string()],
    );

    let result = PredictionEngine::default()
        .predict(&catalog, &query)
        .expect("eligible offerings");

    let coep = result
        .records
        .iter()
        .find(|record| record.institution == "College of Engineering Pune")
        .expect("coep predicted");
    assert_eq!(coep.round, 1);
    assert_eq!(coep.cutoff, 99.7);
    assert_eq!(coep.trend.last_round, 3);
    assert_eq!(coep.trend.last_cutoff, 99.2);
    assert_eq!(coep.trend.rounds_with_data, 3);
    assert_eq!(coep.trend.confidence_score, 82);
}

#[test]
fn unusable_offering_cutoffs_fall_back_to_the_institution() {
    let catalog = catalog();
    let query = PredictionQuery::new(
        91.0,
        Category::General,
        vec!["Information Technology".to_string(), "Mechanical".to_string()],
    );

    let result = PredictionEngine::default()
        .predict(&catalog, &query)
        .expect("institution cutoff applies");

    assert_eq!(result.records.len(), 2);
    assert!(result
        .records
        .iter()
        .all(|record| record.cutoff == 91.2 && record.round == 1));
}

#[test]
fn malformed_snapshots_are_rejected() {
    let broken = r#"{ "institutions": [ { "name": "X", "ownership": "Private", "cutoff": { "general": "n/a" } } ] }"#;
    assert!(matches!(
        InMemoryCatalog::from_reader(Cursor::new(broken)),
        Err(CatalogError::Json(_))
    ));
}

#[test]
fn ladies_seats_apply_only_when_requested() {
    let catalog = catalog();
    let mut query = PredictionQuery::new(
        97.0,
        Category::General,
        vec!["Computer Science".to_string()],
    );
    query.include_ladies = true;

    let result = PredictionEngine::default()
        .predict(&catalog, &query)
        .expect("eligible offerings");
    let pccoe = result
        .records
        .iter()
        .find(|record| record.institution == "Pimpri Chinchwad College of Engineering")
        .expect("pccoe predicted");
    assert_eq!(pccoe.trend.first_cutoff, 97.1);
    assert_eq!(pccoe.seat_type, SeatType::HomeUniversity);
    assert_eq!(pccoe.cutoff, 98.3);
    assert_eq!(pccoe.probability, AdmissionBand::Borderline);
    assert!(catalog.institutions().len() >= 3);
}

#[tokio::test]
async fn prediction_round_trips_through_the_router() {
    let router = prediction_router(Arc::new(service()));

    let payload = serde_json::to_vec(&request(97.5, &["Electronics and Telecommunication"]))
        .expect("request json");
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/predictions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    let created: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    let id = created["id"].as_str().expect("prediction id").to_string();
    assert_eq!(
        created["result"]["records"][0]["course"],
        "Electronics & Telecommunication Engineering"
    );

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/predictions/{id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}
