mod demand;
mod grouped;
mod query;
mod summary;
pub mod views;

pub use demand::{DemandPoint, DemandSeries};
pub use grouped::{GroupedAggregate, GroupedRow};
pub use query::{parse_bound, QueryError, ReportQuery, ResolvedSelection};
pub use summary::KpiSummary;

use super::domain::{Acuity, Disposition, VisitRecord, Zone};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Everything one dashboard refresh renders, derived from a filtered view of
/// the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub window: ReportWindow,
    pub selection: ResolvedSelection,
    pub overall: KpiSummary,
    pub zone: KpiSummary,
    pub acuity: KpiSummary,
    pub disposition: KpiSummary,
    pub by_zone: GroupedAggregate<Zone>,
    pub by_acuity: GroupedAggregate<Acuity>,
    pub by_disposition: GroupedAggregate<Disposition>,
    pub hourly_demand: DemandSeries,
    pub table: Vec<VisitRecord>,
}

/// Filters `records` to the query window and derives every dashboard figure
/// from the result. Never fails: an inverted window or an unknown selection
/// simply produces empty slices.
pub fn build_report(records: &[VisitRecord], query: &ReportQuery) -> DashboardReport {
    let selection = ResolvedSelection::resolve(query);
    let filtered: Vec<&VisitRecord> = records
        .iter()
        .filter(|record| query.contains(record.timestamp))
        .collect();

    let overall = KpiSummary::from_records(filtered.iter().copied());
    let zone = slice_summary(&filtered, selection.zone, |record| record.zone);
    let acuity = slice_summary(&filtered, selection.acuity, |record| record.acuity);
    let disposition = slice_summary(&filtered, selection.disposition, |record| {
        record.disposition
    });

    let report = DashboardReport {
        window: ReportWindow {
            start: query.start,
            end: query.end,
        },
        selection,
        overall,
        zone,
        acuity,
        disposition,
        by_zone: GroupedAggregate::build(filtered.iter().copied()),
        by_acuity: GroupedAggregate::build(filtered.iter().copied()),
        by_disposition: GroupedAggregate::build(filtered.iter().copied()),
        hourly_demand: DemandSeries::hourly(filtered.iter().copied()),
        table: filtered.into_iter().cloned().collect(),
    };

    tracing::debug!(
        start = %query.start,
        end = %query.end,
        visits = report.overall.visits,
        "built dashboard report"
    );

    report
}

fn slice_summary<T, F>(filtered: &[&VisitRecord], selected: Option<T>, key: F) -> KpiSummary
where
    T: PartialEq,
    F: Fn(&VisitRecord) -> T,
{
    match selected {
        Some(selected) => KpiSummary::from_records(
            filtered
                .iter()
                .copied()
                .filter(|record| key(*record) == selected),
        ),
        None => KpiSummary::default(),
    }
}
