use chrono::NaiveDateTime;
use clap::Args;
use ed_dashboard::config::{parse_seed, DatasetConfig};
use ed_dashboard::dashboard::report::parse_bound;
use ed_dashboard::dashboard::VisitDataset;
use ed_dashboard::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: VisitDataset,
}

/// A `--seed` value; `None` inside means "draw from entropy".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedChoice(pub(crate) Option<u64>);

/// Overrides for the synthetic sample shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DatasetArgs {
    /// Seed for the synthetic visit sample, or `random` for a fresh sample
    #[arg(long, value_parser = parse_seed_arg)]
    pub(crate) seed: Option<SeedChoice>,
}

impl DatasetArgs {
    pub(crate) fn apply(&self, config: &mut DatasetConfig) {
        if let Some(SeedChoice(seed)) = self.seed {
            config.seed = seed;
        }
    }
}

pub(crate) fn load_dataset(config: &DatasetConfig) -> Result<VisitDataset, AppError> {
    let dataset = VisitDataset::synthetic(config)?;
    tracing::info!(
        rows = dataset.len(),
        start = %config.start,
        end = %config.end,
        "visit dataset ready"
    );
    Ok(dataset)
}

pub(crate) fn parse_bound_arg(raw: &str) -> Result<NaiveDateTime, String> {
    parse_bound(raw).map_err(|err| err.to_string())
}

fn parse_seed_arg(raw: &str) -> Result<SeedChoice, String> {
    parse_seed(raw).map(SeedChoice).map_err(|err| err.to_string())
}

pub(crate) fn parse_optional_bound(
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, AppError> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| parse_bound(value).map_err(AppError::from))
        .transpose()
}

#[cfg(test)]
pub(crate) fn test_state(dataset: VisitDataset) -> AppState {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new().build_recorder().handle();
    AppState {
        readiness: Arc::new(AtomicBool::new(true)),
        metrics: Arc::new(handle),
        dataset,
    }
}
