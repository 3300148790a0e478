use crate::infra::{build_engine, load_catalog, CatalogSource, InMemoryPredictionArchive};
use clap::Args;
use cutoff_compass::catalog::{
    CatalogError, CategoryCutoffs, CourseOffering, Cutoff, FeeSummary, InMemoryCatalog,
    Institution, OwnershipType, PlacementSummary, Round,
};
use cutoff_compass::config::AppConfig;
use cutoff_compass::error::AppError;
use cutoff_compass::prediction::{
    PredictionEngine, PredictionError, PredictionRequest, PredictionResult, PredictionService,
    PredictionServiceError, QueryGuard,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Candidate percentile (0-100)
    #[arg(long, value_parser = crate::infra::parse_percentile)]
    pub(crate) percentile: f64,
    /// Declared reservation category (general/open, obc, sc, st, ews, vjnt, nt1, nt2, nt3, sebc)
    #[arg(long)]
    pub(crate) category: String,
    /// Requested course name. Repeat for several courses.
    #[arg(long = "course", required = true)]
    pub(crate) courses: Vec<String>,
    /// Consider ladies seat cutoffs
    #[arg(long)]
    pub(crate) ladies: bool,
    /// Consider TFWS seat cutoffs
    #[arg(long)]
    pub(crate) tfws: bool,
    /// Preferred university type; advisory only
    #[arg(long)]
    pub(crate) university_type: Option<String>,
    /// Catalog snapshot to read instead of CATALOG_PATH
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Candidate percentile used for the walkthrough
    #[arg(long, default_value_t = 97.0, value_parser = crate::infra::parse_percentile)]
    pub(crate) percentile: f64,
    /// Include TFWS seats in the walkthrough
    #[arg(long)]
    pub(crate) tfws: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        percentile,
        category,
        courses,
        ladies,
        tfws,
        university_type,
        catalog,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if catalog.is_some() {
        config.catalog.snapshot_path = catalog;
    }

    let (catalog, source) = load_catalog(&config.catalog)?;
    let engine = build_engine(&config)?;
    let query = QueryGuard::default().query_from_request(PredictionRequest {
        percentile: Some(percentile),
        category: Some(category),
        courses,
        include_ladies: ladies,
        include_tfws: tfws,
        university_type,
    })?;

    match engine.predict(&catalog, &query) {
        Ok(result) if json => println!("{}", render_json(&result)?),
        Ok(result) => render_result(&result, &source),
        Err(err) => render_no_results(&err),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { percentile, tfws } = args;

    println!("Admission prediction demo");
    let service = PredictionService::new(
        Arc::new(sample_catalog()?),
        Arc::new(InMemoryPredictionArchive::default()),
        PredictionEngine::default(),
    );

    let walkthrough = [
        (
            "Computer-family courses",
            vec!["Computer Engineering".to_string(), "IT".to_string()],
            false,
        ),
        (
            "Core branches with ladies seats",
            vec!["Electronics & Telecommunication".to_string(), "Mechanical".to_string()],
            true,
        ),
    ];

    for (title, courses, ladies) in walkthrough {
        println!("\n== {title} ==");
        let request = PredictionRequest {
            percentile: Some(percentile),
            category: Some("general".to_string()),
            courses,
            include_ladies: ladies,
            include_tfws: tfws,
            university_type: Some("Government".to_string()),
        };

        match service.predict(request) {
            Ok(archived) => {
                println!("Archived as {}", archived.id.0);
                render_result(&archived.result, &CatalogSource::Sample);
            }
            Err(PredictionServiceError::Prediction(err)) => render_no_results(&err),
            Err(err) => println!("  Prediction unavailable: {err}"),
        }
    }

    Ok(())
}

pub(crate) fn render_json(result: &PredictionResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub(crate) fn render_result(result: &PredictionResult, source: &CatalogSource) {
    println!(
        "Percentile {:.2} ({}, {} policy) | window {:.2}-{:.2} | {}",
        result.query.percentile,
        result.query.category.label(),
        result.category_policy,
        result.window.low,
        result.window.high,
        source.describe()
    );

    for course in &result.by_course {
        println!(
            "\n{} - {} matched offering(s), {} eligible",
            course.requested_course,
            course.matched_offerings,
            course.records.len()
        );
        for record in &course.records {
            let preferred = if record.preferred_ownership { " *" } else { "" };
            println!(
                "  {:>2}. {} ({}, {}){} - {}",
                record.rank,
                record.institution,
                record.city,
                record.ownership.label(),
                preferred,
                record.course
            );
            println!(
                "      round {} {} cutoff {:.2} | gap {:+.2} | {}% {} ({}) | confidence {}",
                record.round,
                record.seat_type.label(),
                record.cutoff,
                record.final_gap,
                record.admission_chance,
                record.probability.label(),
                record.risk_label.label(),
                record.trend.confidence_score
            );
            println!("      {}", record.insight);
        }
    }

    let summary = &result.summary;
    println!(
        "\nSummary: {} college(s) | {} high | {} medium | {} low | average chance {:.1}%",
        summary.total, summary.high, summary.medium, summary.low, summary.average_admission_chance
    );
}

fn render_no_results(err: &PredictionError) {
    let PredictionError::NoEligibleColleges {
        window_low,
        window_high,
        ..
    } = err;
    println!("  {err}");
    println!("  Searched cutoffs from {window_low:.2} to {window_high:.2}.");
}

fn rounds(values: &[f64]) -> Vec<Round> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Round {
            number: index as u8 + 1,
            cutoff: Cutoff::general(*value),
        })
        .collect()
}

fn course(name: &str, seats: u32, values: &[f64]) -> CourseOffering {
    CourseOffering {
        name: name.to_string(),
        seats: Some(seats),
        rounds: rounds(values),
        cutoff: values.first().copied().map(Cutoff::general),
    }
}

fn with_seat_columns(mut offering: CourseOffering, tfws: &[f64], ladies: &[f64]) -> CourseOffering {
    for (round, value) in offering.rounds.iter_mut().zip(tfws) {
        round.cutoff.tfws = Some(*value);
    }
    for (round, value) in offering.rounds.iter_mut().zip(ladies) {
        round.cutoff.ladies = CategoryCutoffs {
            general: Some(*value),
            ..CategoryCutoffs::default()
        };
    }
    offering
}

fn institution(
    name: &str,
    city: &str,
    ownership: OwnershipType,
    annual_fee: u32,
    average_package_lpa: f32,
    courses: Vec<CourseOffering>,
) -> Institution {
    Institution {
        name: name.to_string(),
        city: city.to_string(),
        ownership,
        fees: FeeSummary {
            annual_fee: Some(annual_fee),
        },
        placement: PlacementSummary {
            average_package_lpa: Some(average_package_lpa),
            ..PlacementSummary::default()
        },
        cutoff: None,
        courses,
    }
}

/// Small catalog used by `demo` and by `serve` when no snapshot is configured.
pub(crate) fn sample_catalog() -> Result<InMemoryCatalog, CatalogError> {
    let mut legacy = institution(
        "Rajarambapu Institute of Technology",
        "Islampur",
        OwnershipType::Autonomous,
        118_000,
        5.4,
        vec![CourseOffering {
            name: "Mechanical Engineering".to_string(),
            seats: Some(120),
            rounds: Vec::new(),
            cutoff: None,
        }],
    );
    legacy.cutoff = Some(Cutoff::general(86.4));

    InMemoryCatalog::new(vec![
        institution(
            "College of Engineering Pune",
            "Pune",
            OwnershipType::Government,
            92_000,
            9.8,
            vec![
                with_seat_columns(
                    course("Computer Engineering", 132, &[99.81, 99.62, 99.55, 99.41]),
                    &[99.9, 99.78],
                    &[99.7, 99.5],
                ),
                course(
                    "Electronics and Telecommunication Engineering",
                    66,
                    &[98.9, 98.6, 98.4],
                ),
                course("Mechanical Engineering", 99, &[96.2, 95.8]),
            ],
        ),
        institution(
            "Pune Institute of Computer Technology",
            "Pune",
            OwnershipType::Autonomous,
            125_000,
            11.2,
            vec![
                with_seat_columns(
                    course("Computer Engineering", 240, &[99.2, 99.0, 98.8, 98.6]),
                    &[99.5],
                    &[98.7, 98.4],
                ),
                course("Information Technology", 180, &[98.7, 98.5, 98.1]),
            ],
        ),
        institution(
            "Government College of Engineering Karad",
            "Karad",
            OwnershipType::Government,
            88_000,
            6.9,
            vec![
                course("Computer Engineering", 66, &[97.4, 97.1]),
                with_seat_columns(
                    course("Electronics & Telecommunication Engineering", 66, &[95.6, 95.1]),
                    &[],
                    &[94.2, 93.8],
                ),
                course("Mechanical Engineering", 66, &[93.8, 93.1, 92.7]),
            ],
        ),
        institution(
            "Vishwakarma Institute of Technology",
            "Pune",
            OwnershipType::Private,
            185_000,
            8.1,
            vec![
                course("Computer Science and Engineering (AI & ML)", 120, &[98.3, 98.9]),
                course("Information Technology", 120, &[97.9, 97.6, 97.2, 97.0]),
            ],
        ),
        legacy,
    ])
}
