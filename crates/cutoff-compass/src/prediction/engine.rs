use std::collections::HashSet;

use tracing::debug;

use super::aggregate::{self, CoursePredictions, PredictionRecord, PredictionResult};
use super::classifier::{classify, insight};
use super::config::PredictionConfig;
use super::intake::PredictionQuery;
use super::matcher::{AliasTable, CourseMatcher};
use super::selector::{select_cutoffs, CategoryPolicy, SeatPreferences};
use super::trend::TrendAnalyzer;
use super::window::{best_matching_round, EligibilityWindow};
use crate::catalog::{CatalogStore, CourseRef};

/// Raised when no requested course produced an eligible offering.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(
        "no colleges found with cutoffs between {window_low:.2} and {window_high:.2} percentile for your percentile of {percentile:.2}; try additional courses or enable other seat types"
    )]
    NoEligibleColleges {
        percentile: f64,
        window_low: f64,
        window_high: f64,
    },
}

/// Stateless engine turning a validated query into ranked predictions.
#[derive(Debug)]
pub struct PredictionEngine {
    config: PredictionConfig,
    matcher: CourseMatcher,
    policy: Box<dyn CategoryPolicy>,
    trend: TrendAnalyzer,
}

impl PredictionEngine {
    pub fn new(config: PredictionConfig) -> Self {
        Self::with_aliases(config, &AliasTable::builtin())
    }

    pub fn with_aliases(config: PredictionConfig, aliases: &AliasTable) -> Self {
        let policy = config.category_policy.policy();
        Self::with_policy(config, aliases, policy)
    }

    pub fn with_policy(
        config: PredictionConfig,
        aliases: &AliasTable,
        policy: Box<dyn CategoryPolicy>,
    ) -> Self {
        let config = config.sanitized();
        let trend = TrendAnalyzer::new(config.canonical_rounds, config.trend_leniency);

        Self {
            config,
            matcher: CourseMatcher::new(aliases),
            policy,
            trend,
        }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn predict<C>(
        &self,
        catalog: &C,
        query: &PredictionQuery,
    ) -> Result<PredictionResult, PredictionError>
    where
        C: CatalogStore + ?Sized,
    {
        let window =
            EligibilityWindow::for_percentile(query.percentile, self.config.eligibility_window);
        let preferences = SeatPreferences {
            include_ladies: query.include_ladies,
            include_tfws: query.include_tfws,
            column: self.policy.column_for(query.category),
        };

        let mut claimed = HashSet::new();
        let mut by_course = Vec::with_capacity(query.courses.len());

        for requested in &query.courses {
            let matches = self.matcher.matches(requested, catalog);
            let matched_offerings = matches.len();

            let mut records: Vec<PredictionRecord> = matches
                .into_iter()
                .filter_map(|entry| {
                    if claimed.contains(&entry.key()) {
                        return None;
                    }
                    let record =
                        self.predict_offering(requested, &entry, query, &window, &preferences)?;
                    claimed.insert(entry.key());
                    Some(record)
                })
                .collect();

            aggregate::rank_course(&mut records);
            debug!(
                course = %requested,
                matched_offerings,
                eligible = records.len(),
                "course predictions ranked"
            );

            by_course.push(CoursePredictions {
                requested_course: requested.clone(),
                matched_offerings,
                records,
            });
        }

        let records = aggregate::merge(&by_course);
        if records.is_empty() {
            return Err(PredictionError::NoEligibleColleges {
                percentile: query.percentile,
                window_low: window.low,
                window_high: window.high,
            });
        }

        let summary = aggregate::summarize(&records);

        Ok(PredictionResult {
            query: query.clone(),
            category_policy: self.policy.name(),
            alias_version: self.matcher.alias_version(),
            window,
            records,
            by_course,
            summary,
        })
    }

    fn predict_offering(
        &self,
        requested: &str,
        entry: &CourseRef<'_>,
        query: &PredictionQuery,
        window: &EligibilityWindow,
        preferences: &SeatPreferences,
    ) -> Option<PredictionRecord> {
        let series = select_cutoffs(entry, preferences);
        if series.is_empty() {
            debug!(
                institution = %entry.institution.name,
                course = %entry.course.name,
                "offering has no usable cutoff data"
            );
            return None;
        }

        let best = best_matching_round(&series, window)?;
        let trend = self.trend.analyze(&series)?;
        let final_gap = trend.final_gap(query.percentile);
        let classification = classify(final_gap);

        Some(PredictionRecord {
            requested_course: requested.to_string(),
            rank: 0,
            institution: entry.institution.name.clone(),
            city: entry.institution.city.clone(),
            ownership: entry.institution.ownership,
            course: entry.course.name.clone(),
            seats: entry.course.seats,
            seat_type: best.seat_type,
            round: best.round,
            cutoff: best.value,
            final_gap,
            admission_chance: classification.admission_chance,
            probability: classification.probability,
            risk_label: classification.risk_label,
            insight: insight(final_gap, &trend),
            trend,
            fees: entry.institution.fees,
            placement: entry.institution.placement,
            preferred_ownership: query.university_type == Some(entry.institution.ownership),
        })
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(PredictionConfig::default())
    }
}
