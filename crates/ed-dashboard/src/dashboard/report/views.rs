use super::{DashboardReport, DemandPoint, DemandSeries, GroupedAggregate, KpiSummary, ReportQuery};
use crate::dashboard::dataset::VisitDataset;
use crate::dashboard::domain::{Acuity, Dimension, Disposition, Zone};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub label: &'static str,
    pub display: String,
    pub value: Option<f64>,
}

impl KpiSummary {
    /// Tiles in the order the dashboard lays them out.
    pub fn tiles(&self) -> Vec<KpiTile> {
        vec![
            KpiTile {
                label: "Total Visits",
                display: self.visits.to_string(),
                value: Some(self.visits as f64),
            },
            minutes_tile("Avg LOS", self.avg_length_of_stay),
            minutes_tile("Avg Door-to-Doc", self.avg_door_to_doc),
            minutes_tile("Avg Doc-to-Dispo", self.avg_doc_to_dispo),
            minutes_tile("Avg Boarding Time", self.avg_boarding_time),
            rate_tile("LWBS Rate", self.lwbs_rate),
            rate_tile("72h Revisit Rate", self.revisit_rate),
        ]
    }
}

fn minutes_tile(label: &'static str, value: Option<f64>) -> KpiTile {
    let display = match value {
        Some(minutes) if minutes.is_finite() => format!("{minutes:.1} min"),
        _ => UNAVAILABLE.to_string(),
    };
    KpiTile {
        label,
        display,
        value,
    }
}

fn rate_tile(label: &'static str, rate: f64) -> KpiTile {
    KpiTile {
        label,
        display: format!("{rate:.1}%"),
        value: Some(rate),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartView {
    pub title: &'static str,
    pub y_axis_title: &'static str,
    pub categories: Vec<&'static str>,
    pub series: Vec<ChartSeries>,
}

impl<D: Dimension> GroupedAggregate<D> {
    /// Grouped bars of the four timing measures, one group per category.
    pub fn chart(&self, title: &'static str) -> BarChartView {
        let series_for = |name: &'static str, pick: fn(&KpiSummary) -> Option<f64>| ChartSeries {
            name,
            values: self.rows.iter().map(|row| pick(&row.summary)).collect(),
        };

        BarChartView {
            title,
            y_axis_title: "Minutes",
            categories: self.rows.iter().map(|row| row.label).collect(),
            series: vec![
                series_for("Avg LOS", |summary| summary.avg_length_of_stay),
                series_for("Avg Door-to-Doc", |summary| summary.avg_door_to_doc),
                series_for("Avg Doc-to-Dispo", |summary| summary.avg_doc_to_dispo),
                series_for("Avg Boarding Time", |summary| summary.avg_boarding_time),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartView {
    pub title: &'static str,
    pub y_axis_title: &'static str,
    pub points: Vec<DemandPoint>,
}

impl DemandSeries {
    pub fn chart(&self) -> LineChartView {
        LineChartView {
            title: "Hourly ED Visits",
            y_axis_title: "Number of Visits",
            points: self.points.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionLabels {
    pub zone: Option<&'static str>,
    pub acuity: Option<&'static str>,
    pub disposition: Option<&'static str>,
}

/// Presentation-ready projection of a [`DashboardReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub selection: SelectionLabels,
    pub overall_kpis: Vec<KpiTile>,
    pub zone_kpis: Vec<KpiTile>,
    pub acuity_kpis: Vec<KpiTile>,
    pub disposition_kpis: Vec<KpiTile>,
    pub zone_chart: BarChartView,
    pub acuity_chart: BarChartView,
    pub disposition_chart: BarChartView,
    pub demand_chart: LineChartView,
}

impl DashboardReport {
    pub fn view(&self) -> DashboardView {
        DashboardView {
            start: self.window.start,
            end: self.window.end,
            selection: SelectionLabels {
                zone: self.selection.zone.map(Zone::label),
                acuity: self.selection.acuity.map(Acuity::label),
                disposition: self.selection.disposition.map(Disposition::label),
            },
            overall_kpis: self.overall.tiles(),
            zone_kpis: self.zone.tiles(),
            acuity_kpis: self.acuity.tiles(),
            disposition_kpis: self.disposition.tiles(),
            zone_chart: self.by_zone.chart("KPIs Across Zones"),
            acuity_chart: self.by_acuity.chart("KPIs Across Acuity Levels"),
            disposition_chart: self.by_disposition.chart("KPIs Across Dispositions"),
            demand_chart: self.hourly_demand.chart(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// Bounds for the date picker and the entries of each dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardOptions {
    pub min_date: Option<NaiveDateTime>,
    pub max_date: Option<NaiveDateTime>,
    pub zones: Vec<SelectOption>,
    pub acuities: Vec<SelectOption>,
    pub dispositions: Vec<SelectOption>,
    pub defaults: ReportQuery,
}

impl DashboardOptions {
    pub fn from_dataset(dataset: &VisitDataset) -> Self {
        let bounds = dataset.time_bounds();
        Self {
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
            zones: select_options::<Zone>(),
            acuities: select_options::<Acuity>(),
            dispositions: select_options::<Disposition>(),
            defaults: ReportQuery::defaults(dataset),
        }
    }
}

fn select_options<D: Dimension>() -> Vec<SelectOption> {
    D::ordered()
        .iter()
        .map(|value| SelectOption {
            label: value.label(),
            value: value.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::VisitRecord;
    use crate::dashboard::report::build_report;
    use chrono::NaiveDate;

    fn visit(zone: Zone, boarding: f64) -> VisitRecord {
        VisitRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 2)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            zone,
            acuity: Acuity::Esi1,
            disposition: Disposition::Admitted,
            length_of_stay: 181.24,
            door_to_doc: 19.96,
            doc_to_dispo: 150.0,
            boarding_time: boarding,
            left_without_being_seen: true,
            revisit_72h: false,
        }
    }

    #[test]
    fn tiles_format_minutes_rates_and_unavailable_values() {
        let visits = [visit(Zone::Protocol, 0.0), visit(Zone::Protocol, 0.0)];
        let summary = KpiSummary::from_records(&visits);
        let tiles = summary.tiles();
        let displays: Vec<&str> = tiles.iter().map(|tile| tile.display.as_str()).collect();

        assert_eq!(
            displays,
            ["2", "181.2 min", "20.0 min", "150.0 min", "N/A", "100.0%", "0.0%"]
        );
        assert_eq!(tiles[4].label, "Avg Boarding Time");
        assert!(tiles[4].value.is_none());
    }

    #[test]
    fn empty_summary_tiles_never_show_numbers_for_means() {
        let tiles = KpiSummary::default().tiles();
        assert_eq!(tiles[0].display, "0");
        assert!(tiles[1..5].iter().all(|tile| tile.display == UNAVAILABLE));
    }

    #[test]
    fn chart_keeps_one_value_per_category() {
        let visits = [visit(Zone::Pediatrics, 45.0)];
        let grouped = GroupedAggregate::<Zone>::build(&visits);
        let chart = grouped.chart("KPIs Across Zones");

        assert_eq!(chart.categories, ["Adults B1", "Pediatrics", "Protocol", "UCC"]);
        assert_eq!(chart.series.len(), 4);
        let boarding = &chart.series[3];
        assert_eq!(boarding.name, "Avg Boarding Time");
        assert_eq!(boarding.values, [None, Some(45.0), None, None]);
    }

    #[test]
    fn options_describe_dataset_bounds_and_dropdowns() {
        let dataset = VisitDataset::from_records(vec![visit(Zone::AdultsB1, 0.0)]);
        let options = DashboardOptions::from_dataset(&dataset);

        assert_eq!(options.min_date, options.max_date);
        assert_eq!(options.zones.len(), 4);
        assert_eq!(options.acuities[4].value, "ESI5");
        assert_eq!(options.dispositions[1].label, "Discharged");
        assert_eq!(options.defaults.zone, "Adults B1");
    }

    #[test]
    fn view_labels_selection_and_titles_charts() {
        let dataset = VisitDataset::from_records(vec![visit(Zone::AdultsB1, 12.0)]);
        let mut query = ReportQuery::defaults(&dataset);
        query.disposition = "Observation".into();

        let view = build_report(dataset.records(), &query).view();
        assert_eq!(view.selection.zone, Some("Adults B1"));
        assert_eq!(view.selection.disposition, None);
        assert_eq!(view.disposition_kpis[0].display, "0");
        assert_eq!(view.acuity_chart.title, "KPIs Across Acuity Levels");
        assert_eq!(view.demand_chart.points.len(), 1);
    }
}
