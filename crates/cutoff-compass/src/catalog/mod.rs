//! Read-only catalog of institutions, course offerings, rounds, and cutoffs.

pub mod domain;
pub(crate) mod normalizer;
mod snapshot;
pub mod store;

pub use domain::{
    usable_percentile, Category, CategoryCutoffs, CourseOffering, Cutoff, FeeSummary, Institution,
    OwnershipType, PlacementSummary, Round,
};
pub use store::{CatalogError, CatalogStore, CourseRef, InMemoryCatalog};
