use ed_dashboard::dashboard::report::views::KpiTile;
use ed_dashboard::dashboard::report::{GroupedAggregate, KpiSummary};
use ed_dashboard::dashboard::{DashboardReport, Dimension, ReportQuery};
use std::io::{self, Write};

pub(crate) fn render_dashboard_report<W: Write>(
    out: &mut W,
    query: &ReportQuery,
    report: &DashboardReport,
    list_visits: bool,
) -> io::Result<()> {
    writeln!(out, "Emergency department dashboard")?;
    writeln!(
        out,
        "Window: {} -> {} ({} visits)",
        report.window.start, report.window.end, report.overall.visits
    )?;

    render_kpis(out, "Overall ED", &report.overall)?;
    render_kpis(
        out,
        &selection_heading("Zone", &query.zone, report.selection.zone.is_some()),
        &report.zone,
    )?;
    render_kpis(
        out,
        &selection_heading("Acuity", &query.acuity, report.selection.acuity.is_some()),
        &report.acuity,
    )?;
    render_kpis(
        out,
        &selection_heading(
            "Disposition",
            &query.disposition,
            report.selection.disposition.is_some(),
        ),
        &report.disposition,
    )?;

    render_grouped(out, "KPIs across zones", &report.by_zone)?;
    render_grouped(out, "KPIs across acuity levels", &report.by_acuity)?;
    render_grouped(out, "KPIs across dispositions", &report.by_disposition)?;

    writeln!(out, "\nHourly demand")?;
    match report.hourly_demand.peak() {
        Some(peak) => writeln!(
            out,
            "- {} active hours, peak {} visits at {}",
            report.hourly_demand.points.len(),
            peak.visits,
            peak.hour
        )?,
        None => writeln!(out, "- no visits in window")?,
    }

    if list_visits {
        writeln!(out, "\nVisits")?;
        for visit in &report.table {
            writeln!(
                out,
                "- {} | {} | {} | {} | LOS {:.1} | D2D {:.1} | D2Dispo {:.1} | boarding {:.1} | lwbs {} | revisit {}",
                visit.timestamp,
                visit.zone.label(),
                visit.acuity.label(),
                visit.disposition.label(),
                visit.length_of_stay,
                visit.door_to_doc,
                visit.doc_to_dispo,
                visit.boarding_time,
                visit.left_without_being_seen,
                visit.revisit_72h
            )?;
        }
    }

    Ok(())
}

fn selection_heading(dimension: &str, value: &str, known: bool) -> String {
    if known {
        format!("{dimension}: {value}")
    } else {
        format!("{dimension}: {value} (not a known option)")
    }
}

fn render_kpis<W: Write>(out: &mut W, heading: &str, summary: &KpiSummary) -> io::Result<()> {
    writeln!(out, "\n{heading}")?;
    let line = summary
        .tiles()
        .iter()
        .map(|KpiTile { label, display, .. }| format!("{label}: {display}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "- {line}")
}

fn render_grouped<W: Write, D: Dimension>(
    out: &mut W,
    heading: &str,
    grouped: &GroupedAggregate<D>,
) -> io::Result<()> {
    writeln!(out, "\n{heading}")?;
    for row in &grouped.rows {
        let tiles = row.summary.tiles();
        writeln!(
            out,
            "- {}: {} visits | LOS {} | door-to-doc {} | doc-to-dispo {} | boarding {} | LWBS {} | revisit {}",
            row.label,
            row.summary.visits,
            tiles[1].display,
            tiles[2].display,
            tiles[3].display,
            tiles[4].display,
            tiles[5].display,
            tiles[6].display
        )?;
    }
    Ok(())
}
