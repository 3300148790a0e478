use std::collections::HashSet;

use super::domain::{CourseOffering, Institution};
use super::normalizer::normalize_name;

/// A course offering together with the institution that owns it.
#[derive(Debug, Clone, Copy)]
pub struct CourseRef<'a> {
    pub institution_index: usize,
    pub course_index: usize,
    pub institution: &'a Institution,
    pub course: &'a CourseOffering,
}

impl CourseRef<'_> {
    /// Stable identity of the offering within one catalog snapshot.
    pub fn key(&self) -> (usize, usize) {
        (self.institution_index, self.course_index)
    }
}

/// Read-only catalog access consumed by the prediction engine.
pub trait CatalogStore: Send + Sync {
    fn institutions(&self) -> &[Institution];

    /// Every offering whose normalized name contains the normalized fragment.
    fn find_courses_by_name_fragment(&self, fragment: &str) -> Vec<CourseRef<'_>> {
        let needle = normalize_name(fragment);
        if needle.is_empty() {
            return Vec::new();
        }

        self.courses()
            .filter(|entry| normalize_name(&entry.course.name).contains(&needle))
            .collect()
    }

    fn courses(&self) -> Box<dyn Iterator<Item = CourseRef<'_>> + '_> {
        Box::new(
            self.institutions()
                .iter()
                .enumerate()
                .flat_map(|(institution_index, institution)| {
                    institution.courses.iter().enumerate().map(
                        move |(course_index, course)| CourseRef {
                            institution_index,
                            course_index,
                            institution,
                            course,
                        },
                    )
                }),
        )
    }
}

/// Catalog store failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("institution '{0}' appears more than once")]
    DuplicateInstitution(String),
}

/// Immutable catalog held in memory for the lifetime of the service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    institutions: Vec<Institution>,
}

impl InMemoryCatalog {
    pub fn new(institutions: Vec<Institution>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(institutions.len());
        for institution in &institutions {
            if !seen.insert(normalize_name(&institution.name)) {
                return Err(CatalogError::DuplicateInstitution(
                    institution.name.clone(),
                ));
            }
        }

        Ok(Self { institutions })
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }

    pub fn course_count(&self) -> usize {
        self.institutions
            .iter()
            .map(|institution| institution.courses.len())
            .sum()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn institutions(&self) -> &[Institution] {
        &self.institutions
    }
}
