use serde::{Deserialize, Serialize};

use super::selector::{CategoryPolicy, DeclaredCategoryPolicy, OpenCategoryPolicy};

pub const DEFAULT_ELIGIBILITY_WINDOW: f64 = 3.0;
pub const DEFAULT_CANONICAL_ROUNDS: u8 = 4;
pub const DEFAULT_TREND_LENIENCY: f64 = 0.5;

/// Tunables for the prediction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Width in percentile points above the candidate's percentile that is still reachable.
    pub eligibility_window: f64,
    /// Number of rounds in a full allocation cycle, used for data density.
    pub canonical_rounds: u8,
    /// Share of a falling cutoff trend credited back to the candidate.
    pub trend_leniency: f64,
    pub category_policy: CategoryPolicyKind,
}

impl PredictionConfig {
    /// Replaces non-finite or negative values, and zero canonical rounds, with the defaults.
    pub fn sanitized(self) -> Self {
        let eligibility_window = if self.eligibility_window.is_finite() && self.eligibility_window >= 0.0
        {
            self.eligibility_window
        } else {
            DEFAULT_ELIGIBILITY_WINDOW
        };
        let trend_leniency = if self.trend_leniency.is_finite() && self.trend_leniency >= 0.0 {
            self.trend_leniency
        } else {
            DEFAULT_TREND_LENIENCY
        };
        let canonical_rounds = if self.canonical_rounds == 0 {
            DEFAULT_CANONICAL_ROUNDS
        } else {
            self.canonical_rounds
        };

        Self {
            eligibility_window,
            canonical_rounds,
            trend_leniency,
            category_policy: self.category_policy,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            eligibility_window: DEFAULT_ELIGIBILITY_WINDOW,
            canonical_rounds: DEFAULT_CANONICAL_ROUNDS,
            trend_leniency: DEFAULT_TREND_LENIENCY,
            category_policy: CategoryPolicyKind::Open,
        }
    }
}

/// Named choice of which cutoff column a candidate is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicyKind {
    #[default]
    Open,
    Declared,
}

impl CategoryPolicyKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" | "general" => Some(Self::Open),
            "declared" | "category" => Some(Self::Declared),
            _ => None,
        }
    }

    pub fn policy(self) -> Box<dyn CategoryPolicy> {
        match self {
            Self::Open => Box::new(OpenCategoryPolicy),
            Self::Declared => Box::new(DeclaredCategoryPolicy),
        }
    }
}
