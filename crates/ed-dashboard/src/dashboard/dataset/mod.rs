mod export;
mod synthetic;

use super::domain::VisitRecord;
use crate::config::DatasetConfig;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

pub use export::write_table_csv;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset window is inverted: {start} is after {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
    #[error("invalid sampling distribution: {0}")]
    Distribution(String),
}

/// Immutable table of visits shared by every report request.
#[derive(Debug, Clone)]
pub struct VisitDataset {
    records: Arc<[VisitRecord]>,
}

impl VisitDataset {
    pub fn from_records(records: Vec<VisitRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Generates one visit per hour of the configured window for every zone.
    pub fn synthetic(config: &DatasetConfig) -> Result<Self, DatasetError> {
        if config.start > config.end {
            return Err(DatasetError::InvertedWindow {
                start: config.start,
                end: config.end,
            });
        }

        let records = synthetic::generate(config.start, config.end, config.seed)?;
        tracing::debug!(
            rows = records.len(),
            seed = ?config.seed,
            "generated synthetic visit dataset"
        );
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut timestamps = self.records.iter().map(|record| record.timestamp);
        let first = timestamps.next()?;
        Some(timestamps.fold((first, first), |(min, max), ts| {
            (min.min(ts), max.max(ts))
        }))
    }
}
