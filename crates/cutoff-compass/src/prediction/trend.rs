use serde::Serialize;

use super::selector::SelectedCutoff;

const CONFIDENCE_FLOOR: f64 = 29.0;
const CONFIDENCE_SPAN: f64 = 70.0;
const CONFIDENCE_CAP: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Cutoffs held or relaxed across rounds.
    Downward,
    Upward,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            TrendDirection::Downward => "downward",
            TrendDirection::Upward => "upward",
        }
    }
}

/// Shape of an offering's cutoff series across every round with data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub first_cutoff: f64,
    pub last_cutoff: f64,
    pub last_round: u8,
    pub total_change: f64,
    pub volatility: f64,
    pub rounds_with_data: usize,
    pub data_density: f64,
    pub confidence_score: u8,
    pub trend_adjustment: f64,
}

impl TrendAnalysis {
    pub fn adjusted_strength(&self, percentile: f64) -> f64 {
        percentile + self.trend_adjustment
    }

    /// Gap between the adjusted strength and the chronologically last cutoff.
    pub fn final_gap(&self, percentile: f64) -> f64 {
        self.adjusted_strength(percentile) - self.last_cutoff
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalyzer {
    canonical_rounds: u8,
    leniency: f64,
}

impl TrendAnalyzer {
    pub fn new(canonical_rounds: u8, leniency: f64) -> Self {
        Self {
            canonical_rounds: canonical_rounds.max(1),
            leniency,
        }
    }

    /// `series` must be ordered by round number. Returns `None` for an empty series.
    pub fn analyze(&self, series: &[SelectedCutoff]) -> Option<TrendAnalysis> {
        let first = series.first()?;
        let last = series.last()?;

        let total_change = last.value - first.value;
        let direction = if total_change <= 0.0 {
            TrendDirection::Downward
        } else {
            TrendDirection::Upward
        };

        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), selected| {
                (min.min(selected.value), max.max(selected.value))
            });

        let rounds_with_data = series.len();
        let data_density = (rounds_with_data as f64 / f64::from(self.canonical_rounds)).min(1.0);
        let confidence = (data_density * CONFIDENCE_SPAN + CONFIDENCE_FLOOR).round();
        let confidence_score = (confidence as u8).min(CONFIDENCE_CAP);

        let trend_adjustment = match direction {
            TrendDirection::Downward => total_change.abs() * self.leniency,
            TrendDirection::Upward => 0.0,
        };

        Some(TrendAnalysis {
            direction,
            first_cutoff: first.value,
            last_cutoff: last.value,
            last_round: last.round,
            total_change,
            volatility: max - min,
            rounds_with_data,
            data_density,
            confidence_score,
            trend_adjustment,
        })
    }
}
