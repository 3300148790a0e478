use serde::Serialize;

use super::selector::SelectedCutoff;

/// Slack on both bounds for binary rounding of `percentile + width`.
const BOUND_TOLERANCE: f64 = 1e-9;

/// Closed percentile interval `[percentile, percentile + width]` of reachable cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilityWindow {
    pub low: f64,
    pub high: f64,
}

impl EligibilityWindow {
    pub fn for_percentile(percentile: f64, width: f64) -> Self {
        Self {
            low: percentile,
            high: percentile + width,
        }
    }

    pub fn contains(&self, cutoff: f64) -> bool {
        self.low - BOUND_TOLERANCE <= cutoff && cutoff <= self.high + BOUND_TOLERANCE
    }
}

/// Highest eligible cutoff; equal cutoffs resolve to the earliest round.
pub fn best_matching_round(
    series: &[SelectedCutoff],
    window: &EligibilityWindow,
) -> Option<SelectedCutoff> {
    series
        .iter()
        .filter(|selected| window.contains(selected.value))
        .fold(None, |best: Option<SelectedCutoff>, candidate| match best {
            Some(current)
                if current.value > candidate.value
                    || (current.value == candidate.value && current.round <= candidate.round) =>
            {
                Some(current)
            }
            _ => Some(*candidate),
        })
}
