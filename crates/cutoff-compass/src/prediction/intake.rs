use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::normalizer::normalize_name;
use crate::catalog::{Category, OwnershipType};

/// Validation errors raised before a query reaches the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryRejection {
    #[error("percentile is required")]
    MissingPercentile,
    #[error("percentile must be between 0 and 100 (found {0})")]
    PercentileOutOfRange(f64),
    #[error("category is required")]
    MissingCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("at least one course is required")]
    NoCourses,
    #[error("at most {max} courses may be requested (found {found})")]
    TooManyCourses { max: usize, found: usize },
    #[error("unknown university type '{0}'")]
    UnknownUniversityType(String),
}

/// Inbound query exactly as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default, alias = "includeLadies")]
    pub include_ladies: bool,
    #[serde(default, alias = "includeTFWS")]
    pub include_tfws: bool,
    #[serde(default, alias = "universityType")]
    pub university_type: Option<String>,
}

/// Validated query consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionQuery {
    pub percentile: f64,
    pub category: Category,
    pub courses: Vec<String>,
    pub include_ladies: bool,
    pub include_tfws: bool,
    /// Advisory only; never filters results.
    pub university_type: Option<OwnershipType>,
}

impl PredictionQuery {
    pub fn new(percentile: f64, category: Category, courses: Vec<String>) -> Self {
        Self {
            percentile,
            category,
            courses,
            include_ladies: false,
            include_tfws: false,
            university_type: None,
        }
    }
}

pub const DEFAULT_MAX_COURSES: usize = 10;

/// Guard responsible for producing `PredictionQuery` instances.
#[derive(Debug, Clone)]
pub struct QueryGuard {
    max_courses: usize,
}

impl Default for QueryGuard {
    fn default() -> Self {
        Self::with_max_courses(DEFAULT_MAX_COURSES)
    }
}

impl QueryGuard {
    pub fn with_max_courses(max_courses: usize) -> Self {
        Self {
            max_courses: max_courses.max(1),
        }
    }

    pub fn query_from_request(
        &self,
        request: PredictionRequest,
    ) -> Result<PredictionQuery, QueryRejection> {
        let percentile = request
            .percentile
            .ok_or(QueryRejection::MissingPercentile)?;
        if !percentile.is_finite() || !(0.0..=100.0).contains(&percentile) {
            return Err(QueryRejection::PercentileOutOfRange(percentile));
        }

        let raw_category = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(QueryRejection::MissingCategory)?;
        let category = Category::parse(raw_category)
            .ok_or_else(|| QueryRejection::UnknownCategory(raw_category.to_string()))?;

        let mut seen = HashSet::new();
        let courses: Vec<String> = request
            .courses
            .into_iter()
            .map(|course| course.trim().to_string())
            .filter(|course| !course.is_empty())
            .filter(|course| seen.insert(normalize_name(course)))
            .collect();
        if courses.is_empty() {
            return Err(QueryRejection::NoCourses);
        }
        if courses.len() > self.max_courses {
            return Err(QueryRejection::TooManyCourses {
                max: self.max_courses,
                found: courses.len(),
            });
        }

        let university_type = match request.university_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) if value.eq_ignore_ascii_case("any") || value.eq_ignore_ascii_case("all") => {
                None
            }
            Some(value) => Some(
                OwnershipType::parse(value)
                    .ok_or_else(|| QueryRejection::UnknownUniversityType(value.to_string()))?,
            ),
        };

        Ok(PredictionQuery {
            percentile,
            category,
            courses,
            include_ladies: request.include_ladies,
            include_tfws: request.include_tfws,
            university_type,
        })
    }
}
