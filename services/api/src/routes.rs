use crate::infra::{parse_optional_bound, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use ed_dashboard::dashboard::report::views::{DashboardOptions, DashboardView};
use ed_dashboard::dashboard::report::GroupedAggregate;
use ed_dashboard::dashboard::{
    build_report, write_table_csv, Acuity, Disposition, ReportQuery, VisitDataset, VisitRecord,
    Zone,
};
use ed_dashboard::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of the report and table endpoints. Omitted fields keep the value a
/// freshly loaded dashboard would use.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardReportRequest {
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) end_date: Option<String>,
    #[serde(default)]
    pub(crate) zone: Option<String>,
    #[serde(default)]
    pub(crate) acuity: Option<String>,
    #[serde(default)]
    pub(crate) disposition: Option<String>,
    #[serde(default)]
    pub(crate) include_table: bool,
}

impl DashboardReportRequest {
    pub(crate) fn to_query(&self, dataset: &VisitDataset) -> Result<ReportQuery, AppError> {
        let mut query = ReportQuery::defaults(dataset);
        if let Some(start) = parse_optional_bound(self.start_date.as_deref())? {
            query.start = start;
        }
        if let Some(end) = parse_optional_bound(self.end_date.as_deref())? {
            query.end = end;
        }
        if let Some(zone) = &self.zone {
            query.zone = zone.clone();
        }
        if let Some(acuity) = &self.acuity {
            query.acuity = acuity.clone();
        }
        if let Some(disposition) = &self.disposition {
            query.disposition = disposition.clone();
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupedTables {
    pub(crate) by_zone: GroupedAggregate<Zone>,
    pub(crate) by_acuity: GroupedAggregate<Acuity>,
    pub(crate) by_disposition: GroupedAggregate<Disposition>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardReportResponse {
    pub(crate) visits: usize,
    #[serde(flatten)]
    pub(crate) view: DashboardView,
    pub(crate) grouped: GroupedTables,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) table: Option<Vec<VisitRecord>>,
}

pub(crate) fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard/options", get(options_endpoint))
        .route("/api/v1/dashboard/report", post(report_endpoint))
        .route("/api/v1/dashboard/table.csv", post(table_csv_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn options_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<DashboardOptions> {
    Json(DashboardOptions::from_dataset(&state.dataset))
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardReportRequest>,
) -> Result<Json<DashboardReportResponse>, AppError> {
    let query = payload.to_query(&state.dataset)?;
    let report = build_report(state.dataset.records(), &query);
    let view = report.view();

    let table = if payload.include_table {
        Some(report.table)
    } else {
        None
    };

    Ok(Json(DashboardReportResponse {
        visits: report.overall.visits,
        view,
        grouped: GroupedTables {
            by_zone: report.by_zone,
            by_acuity: report.by_acuity,
            by_disposition: report.by_disposition,
        },
        table,
    }))
}

pub(crate) async fn table_csv_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = payload.to_query(&state.dataset)?;
    let report = build_report(state.dataset.records(), &query);

    let mut body = Vec::new();
    write_table_csv(&report.table, &mut body)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}
