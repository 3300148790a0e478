use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{usable_percentile, Category, CourseRef, Cutoff};

/// Seat quota the selected cutoff was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatType {
    #[serde(rename = "TFWS")]
    Tfws,
    Ladies,
    #[serde(rename = "HU")]
    HomeUniversity,
}

impl SeatType {
    pub const fn label(self) -> &'static str {
        match self {
            SeatType::Tfws => "TFWS",
            SeatType::Ladies => "Ladies",
            SeatType::HomeUniversity => "HU",
        }
    }
}

/// Decides which category column a candidate is scored against.
pub trait CategoryPolicy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    fn column_for(&self, declared: Category) -> Category;
}

/// Scores every candidate against the open (general) column.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCategoryPolicy;

impl CategoryPolicy for OpenCategoryPolicy {
    fn name(&self) -> &'static str {
        "open"
    }

    fn column_for(&self, _declared: Category) -> Category {
        Category::General
    }
}

/// Scores candidates against the column of their declared category.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredCategoryPolicy;

impl CategoryPolicy for DeclaredCategoryPolicy {
    fn name(&self) -> &'static str {
        "declared"
    }

    fn column_for(&self, declared: Category) -> Category {
        declared
    }
}

/// Seat-type flags and the category column resolved for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatPreferences {
    pub include_ladies: bool,
    pub include_tfws: bool,
    pub column: Category,
}

/// The single cutoff chosen for one round of an offering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectedCutoff {
    pub round: u8,
    pub value: f64,
    pub seat_type: SeatType,
}

/// Applies the TFWS > Ladies > open-seat priority to one cutoff snapshot.
pub fn select_seat(cutoff: &Cutoff, preferences: &SeatPreferences) -> Option<(f64, SeatType)> {
    if preferences.include_tfws {
        if let Some(value) = usable_percentile(cutoff.tfws) {
            return Some((value, SeatType::Tfws));
        }
    }

    if preferences.include_ladies {
        if let Some(value) = usable_percentile(cutoff.ladies.get(preferences.column)) {
            return Some((value, SeatType::Ladies));
        }
    }

    usable_percentile(cutoff.open.get(preferences.column))
        .map(|value| (value, SeatType::HomeUniversity))
}

/// Selected cutoffs for every round of the offering, ordered by round number.
///
/// Offerings without round data fall back to a pseudo round 1 built from the offering's flat
/// cutoff, then the institution's flat cutoff.
pub fn select_cutoffs(entry: &CourseRef<'_>, preferences: &SeatPreferences) -> Vec<SelectedCutoff> {
    if entry.course.rounds.is_empty() {
        return [entry.course.cutoff, entry.institution.cutoff]
            .iter()
            .flatten()
            .find_map(|cutoff| select_seat(cutoff, preferences))
            .map(|(value, seat_type)| SelectedCutoff {
                round: 1,
                value,
                seat_type,
            })
            .into_iter()
            .collect();
    }

    let mut selected: Vec<SelectedCutoff> = entry
        .course
        .rounds
        .iter()
        .filter_map(|round| {
            select_seat(&round.cutoff, preferences).map(|(value, seat_type)| SelectedCutoff {
                round: round.number,
                value,
                seat_type,
            })
        })
        .collect();

    selected.sort_by_key(|cutoff| cutoff.round);
    selected
}
