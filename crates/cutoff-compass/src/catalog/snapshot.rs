use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::domain::Institution;
use super::store::{CatalogError, InMemoryCatalog};

/// JSON document handed over by the catalog owner.
#[derive(Debug, Deserialize)]
struct CatalogSnapshot {
    #[serde(default)]
    version: Option<u32>,
    institutions: Vec<Institution>,
}

impl InMemoryCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let snapshot: CatalogSnapshot = serde_json::from_reader(reader)?;
        debug!(
            version = ?snapshot.version,
            institutions = snapshot.institutions.len(),
            "catalog snapshot decoded"
        );
        Self::new(snapshot.institutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{Category, OwnershipType};
    use crate::catalog::store::CatalogStore;
    use std::io::Cursor;

    #[test]
    fn decodes_nested_rounds_and_ladies_cutoffs() {
        let json = r#"{
            "version": 3,
            "institutions": [{
                "name": "Government College of Engineering, Karad",
                "city": "Karad",
                "ownership": "Government",
                "fees": { "annual_fee": 92000 },
                "courses": [{
                    "name": "Computer Engineering",
                    "seats": 66,
                    "rounds": [
                        { "number": 1, "cutoff": { "open": 97.4, "obc": 95.1, "tfws": 98.2, "ladies": { "general": 96.0 } } },
                        { "number": 2, "cutoff": { "general": 96.9, "sc": null } }
                    ]
                }]
            }]
        }"#;

        let catalog = InMemoryCatalog::from_reader(Cursor::new(json)).expect("snapshot decodes");
        let institution = &catalog.institutions()[0];
        assert_eq!(institution.ownership, OwnershipType::Government);
        assert_eq!(institution.fees.annual_fee, Some(92000));

        let course = &institution.courses[0];
        assert_eq!(course.rounds.len(), 2);
        let first = &course.rounds[0].cutoff;
        assert_eq!(first.open.get(Category::General), Some(97.4));
        assert_eq!(first.open.get(Category::Obc), Some(95.1));
        assert_eq!(first.tfws, Some(98.2));
        assert_eq!(first.ladies.general, Some(96.0));
        assert_eq!(course.rounds[1].cutoff.open.sc, None);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = InMemoryCatalog::from_path("./does-not-exist.json").expect_err("io error");
        assert!(matches!(error, CatalogError::Io(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let error =
            InMemoryCatalog::from_reader(Cursor::new("{\"institutions\": 4}")).expect_err("bad");
        assert!(matches!(error, CatalogError::Json(_)));
    }
}
