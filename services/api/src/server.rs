use crate::cli::ServeArgs;
use crate::infra::{build_engine, load_catalog, AppState, InMemoryPredictionArchive};
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cutoff_compass::config::AppConfig;
use cutoff_compass::error::AppError;
use cutoff_compass::prediction::PredictionService;
use cutoff_compass::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (catalog, source) = load_catalog(&config.catalog)?;
    let engine = build_engine(&config)?;
    info!(
        catalog = %source.describe(),
        category_policy = engine.policy_name(),
        window = engine.config().eligibility_window,
        "prediction engine configured"
    );

    let prediction_service = Arc::new(PredictionService::new(
        Arc::new(catalog),
        Arc::new(InMemoryPredictionArchive::default()),
        engine,
    ));

    let app = with_prediction_routes(prediction_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission prediction service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
