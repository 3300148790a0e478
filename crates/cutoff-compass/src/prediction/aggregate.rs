use std::cmp::Ordering;

use serde::Serialize;

use super::classifier::{AdmissionBand, RiskLabel};
use super::intake::PredictionQuery;
use super::selector::SeatType;
use super::trend::TrendAnalysis;
use super::window::EligibilityWindow;
use crate::catalog::{FeeSummary, OwnershipType, PlacementSummary};

/// One ranked admission estimate for a single course offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub requested_course: String,
    /// 1-based position within the requested course's results.
    pub rank: usize,
    pub institution: String,
    pub city: String,
    pub ownership: OwnershipType,
    pub course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    pub seat_type: SeatType,
    pub round: u8,
    pub cutoff: f64,
    pub final_gap: f64,
    pub admission_chance: u8,
    pub probability: AdmissionBand,
    pub risk_label: RiskLabel,
    pub insight: String,
    pub trend: TrendAnalysis,
    pub fees: FeeSummary,
    pub placement: PlacementSummary,
    pub preferred_ownership: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoursePredictions {
    pub requested_course: String,
    pub matched_offerings: usize,
    pub records: Vec<PredictionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_admission_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub query: PredictionQuery,
    pub category_policy: &'static str,
    pub alias_version: u32,
    pub window: EligibilityWindow,
    /// Every course's records merged, most selective cutoff first.
    pub records: Vec<PredictionRecord>,
    pub by_course: Vec<CoursePredictions>,
    pub summary: PredictionSummary,
}

const HIGH_CHANCE_THRESHOLD: u8 = 60;
const MEDIUM_CHANCE_THRESHOLD: u8 = 40;

fn by_cutoff_descending(left: &PredictionRecord, right: &PredictionRecord) -> Ordering {
    right.cutoff.total_cmp(&left.cutoff)
}

/// Sorts one course's records by descending cutoff and assigns ranks 1..=N.
pub(crate) fn rank_course(records: &mut [PredictionRecord]) {
    records.sort_by(by_cutoff_descending);
    for (index, record) in records.iter_mut().enumerate() {
        record.rank = index + 1;
    }
}

/// Combines per-course records without recomputing their ranks.
pub(crate) fn merge(courses: &[CoursePredictions]) -> Vec<PredictionRecord> {
    let mut combined: Vec<PredictionRecord> = courses
        .iter()
        .flat_map(|course| course.records.iter().cloned())
        .collect();
    combined.sort_by(by_cutoff_descending);
    combined
}

pub(crate) fn summarize(records: &[PredictionRecord]) -> PredictionSummary {
    let total = records.len();
    let high = records
        .iter()
        .filter(|record| record.admission_chance >= HIGH_CHANCE_THRESHOLD)
        .count();
    let medium = records
        .iter()
        .filter(|record| {
            (MEDIUM_CHANCE_THRESHOLD..HIGH_CHANCE_THRESHOLD).contains(&record.admission_chance)
        })
        .count();
    let low = total - high - medium;

    let average_admission_chance = if total == 0 {
        0.0
    } else {
        records
            .iter()
            .map(|record| f64::from(record.admission_chance))
            .sum::<f64>()
            / total as f64
    };

    PredictionSummary {
        total,
        high,
        medium,
        low,
        average_admission_chance,
    }
}
