//! College admission prediction over a catalog of institutions and their round-wise cutoffs.
//!
//! The [`prediction`] module holds the engine, the HTTP router, and the service that wires them to
//! a [`catalog::CatalogStore`] and a [`prediction::PredictionArchive`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod prediction;
pub mod telemetry;
