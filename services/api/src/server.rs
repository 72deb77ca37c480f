use crate::cli::ServeArgs;
use crate::infra::{load_dataset, AppState};
use crate::routes::dashboard_router;
use axum_prometheus::PrometheusMetricLayer;
use ed_dashboard::config::AppConfig;
use ed_dashboard::error::AppError;
use ed_dashboard::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    args.dataset.apply(&mut config.dataset);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let dataset = load_dataset(&config.dataset)?;
    let rows = dataset.len();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dataset,
    };

    let app = dashboard_router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, rows, "ed dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
