use serde::Serialize;

use super::trend::{TrendAnalysis, TrendDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdmissionBand {
    Safe,
    Probable,
    Borderline,
    Difficult,
}

impl AdmissionBand {
    pub const fn label(self) -> &'static str {
        match self {
            AdmissionBand::Safe => "Safe",
            AdmissionBand::Probable => "Probable",
            AdmissionBand::Borderline => "Borderline",
            AdmissionBand::Difficult => "Difficult",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    #[serde(rename = "Very High Chance")]
    VeryHighChance,
    Probable,
    Borderline,
}

impl RiskLabel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLabel::VeryHighChance => "Very High Chance",
            RiskLabel::Probable => "Probable",
            RiskLabel::Borderline => "Borderline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub admission_chance: u8,
    pub probability: AdmissionBand,
    pub risk_label: RiskLabel,
}

const VERY_HIGH_CHANCE_THRESHOLD: u8 = 90;

/// Bands the trend-adjusted gap. The bands partition the whole real line.
pub fn classify(final_gap: f64) -> Classification {
    let (admission_chance, probability, risk_label) = if final_gap >= 1.0 {
        (95, AdmissionBand::Safe, RiskLabel::VeryHighChance)
    } else if final_gap >= 0.0 {
        (85, AdmissionBand::Probable, RiskLabel::VeryHighChance)
    } else if final_gap >= -1.0 {
        (65, AdmissionBand::Probable, RiskLabel::Probable)
    } else if final_gap >= -2.5 {
        (45, AdmissionBand::Borderline, RiskLabel::Borderline)
    } else {
        (25, AdmissionBand::Difficult, RiskLabel::Borderline)
    };

    let risk_label = if admission_chance >= VERY_HIGH_CHANCE_THRESHOLD {
        RiskLabel::VeryHighChance
    } else {
        risk_label
    };

    Classification {
        admission_chance,
        probability,
        risk_label,
    }
}

/// Advisory sentence shown next to a prediction.
pub fn insight(final_gap: f64, trend: &TrendAnalysis) -> String {
    let trend_note = match trend.direction {
        TrendDirection::Downward if trend.total_change < 0.0 => format!(
            "cutoffs eased by {:.2} points across {} round(s)",
            trend.total_change.abs(),
            trend.rounds_with_data
        ),
        TrendDirection::Downward => "cutoffs held steady across rounds".to_string(),
        TrendDirection::Upward => format!(
            "cutoffs tightened by {:.2} points across {} round(s)",
            trend.total_change,
            trend.rounds_with_data
        ),
    };

    if final_gap >= 0.0 {
        format!(
            "Strong fit: your adjusted percentile clears the round {} cutoff of {:.2} by {:.2} points and {}.",
            trend.last_round, trend.last_cutoff, final_gap, trend_note
        )
    } else {
        format!(
            "Within reach: the round {} cutoff of {:.2} sits {:.2} points above your adjusted percentile; {}, so keep this option open for later rounds.",
            trend.last_round,
            trend.last_cutoff,
            final_gap.abs(),
            trend_note
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_follow_table() {
        let cases = [
            (3.0, 95, AdmissionBand::Safe, RiskLabel::VeryHighChance),
            (1.0, 95, AdmissionBand::Safe, RiskLabel::VeryHighChance),
            (0.99, 85, AdmissionBand::Probable, RiskLabel::VeryHighChance),
            (0.0, 85, AdmissionBand::Probable, RiskLabel::VeryHighChance),
            (-0.01, 65, AdmissionBand::Probable, RiskLabel::Probable),
            (-1.0, 65, AdmissionBand::Probable, RiskLabel::Probable),
            (-1.01, 45, AdmissionBand::Borderline, RiskLabel::Borderline),
            (-2.5, 45, AdmissionBand::Borderline, RiskLabel::Borderline),
            (-2.51, 25, AdmissionBand::Difficult, RiskLabel::Borderline),
            (-40.0, 25, AdmissionBand::Difficult, RiskLabel::Borderline),
        ];

        for (gap, chance, band, risk) in cases {
            let classification = classify(gap);
            assert_eq!(classification.admission_chance, chance, "gap {gap}");
            assert_eq!(classification.probability, band, "gap {gap}");
            assert_eq!(classification.risk_label, risk, "gap {gap}");
        }
    }

    #[test]
    fn insight_tone_tracks_gap_sign() {
        let trend = TrendAnalysis {
            direction: TrendDirection::Downward,
            first_cutoff: 96.0,
            last_cutoff: 95.0,
            last_round: 3,
            total_change: -1.0,
            volatility: 1.0,
            rounds_with_data: 3,
            data_density: 0.75,
            confidence_score: 82,
            trend_adjustment: 0.5,
        };

        let hopeful = insight(0.4, &trend);
        assert!(hopeful.starts_with("Strong fit"));
        assert!(hopeful.contains("eased by 1.00"));

        let cautious = insight(-1.2, &trend);
        assert!(cautious.starts_with("Within reach"));
        assert!(cautious.contains("later rounds"));
    }
}
