use crate::infra::{load_dataset, parse_bound_arg, DatasetArgs};
use crate::render::render_dashboard_report;
use crate::server;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use ed_dashboard::config::AppConfig;
use ed_dashboard::dashboard::{build_report, write_table_csv, ReportQuery, VisitDataset};
use ed_dashboard::error::AppError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ED Operations Dashboard",
    about = "Serve and query emergency department KPI reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print KPI summaries, grouped aggregates and hourly demand for a window
    Report(ReportArgs),
    /// Write the filtered visit table as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WindowArgs {
    /// Window start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS). Defaults to the first visit
    #[arg(long, value_parser = parse_bound_arg)]
    pub(crate) start: Option<NaiveDateTime>,
    /// Window end, inclusive. Defaults to the last visit
    #[arg(long, value_parser = parse_bound_arg)]
    pub(crate) end: Option<NaiveDateTime>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) window: WindowArgs,
    /// Zone to break out (e.g. "Adults B1", "UCC")
    #[arg(long)]
    pub(crate) zone: Option<String>,
    /// Acuity level to break out (ESI1..ESI5)
    #[arg(long)]
    pub(crate) acuity: Option<String>,
    /// Disposition to break out (Admitted or Discharged)
    #[arg(long)]
    pub(crate) disposition: Option<String>,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Include every filtered visit in the output
    #[arg(long)]
    pub(crate) list_visits: bool,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) window: WindowArgs,
    /// Destination file; stdout when omitted
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Export(args) => run_export(args),
    }
}

fn dataset_for(args: &DatasetArgs) -> Result<VisitDataset, AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.dataset);
    load_dataset(&config.dataset)
}

fn query_for(dataset: &VisitDataset, window: &WindowArgs) -> ReportQuery {
    let mut query = ReportQuery::defaults(dataset);
    if let Some(start) = window.start {
        query.start = start;
    }
    if let Some(end) = window.end {
        query.end = end;
    }
    query
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let dataset = dataset_for(&args.dataset)?;
    let mut query = query_for(&dataset, &args.window);
    if let Some(zone) = args.zone {
        query.zone = zone;
    }
    if let Some(acuity) = args.acuity {
        query.acuity = acuity;
    }
    if let Some(disposition) = args.disposition {
        query.disposition = disposition;
    }

    let report = build_report(dataset.records(), &query);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        render_dashboard_report(&mut out, &query, &report, args.list_visits)?;
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = dataset_for(&args.dataset)?;
    let query = query_for(&dataset, &args.window);
    let report = build_report(dataset.records(), &query);

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            write_table_csv(&report.table, BufWriter::new(file))?;
            eprintln!(
                "wrote {} visits to {}",
                report.table.len(),
                path.display()
            );
        }
        None => write_table_csv(&report.table, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_arguments_parse() {
        let cli = Cli::try_parse_from([
            "ed-dashboard-api",
            "report",
            "--start",
            "2025-03-02",
            "--end",
            "2025-03-03T12:00:00",
            "--zone",
            "UCC",
            "--seed",
            "random",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(
                    args.window.start.map(|start| start.to_string()),
                    Some("2025-03-02 00:00:00".to_string())
                );
                assert_eq!(args.zone.as_deref(), Some("UCC"));
                assert!(args.json);
                assert!(args.dataset.seed.is_some());
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn invalid_window_argument_is_rejected() {
        let result = Cli::try_parse_from(["ed-dashboard-api", "export", "--start", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn window_defaults_to_dataset_bounds() {
        let dataset = VisitDataset::synthetic(&ed_dashboard::config::DatasetConfig::default())
            .expect("dataset builds");
        let window = WindowArgs {
            start: None,
            end: parse_bound_arg("2025-03-02").ok(),
        };
        let query = query_for(&dataset, &window);
        assert_eq!(query.start.to_string(), "2025-03-01 00:00:00");
        assert_eq!(query.end.to_string(), "2025-03-02 00:00:00");
    }
}
