use crate::dashboard::domain::VisitRecord;
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemandPoint {
    pub hour: NaiveDateTime,
    pub visits: usize,
}

/// Visit counts per clock hour, ascending. Hours without visits are omitted,
/// not zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemandSeries {
    pub points: Vec<DemandPoint>,
}

impl DemandSeries {
    pub fn hourly<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a VisitRecord>,
    {
        let mut buckets: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
        for record in records {
            *buckets.entry(truncate_to_hour(record.timestamp)).or_insert(0) += 1;
        }

        let points = buckets
            .into_iter()
            .map(|(hour, visits)| DemandPoint { hour, visits })
            .collect();
        Self { points }
    }

    pub fn total_visits(&self) -> usize {
        self.points.iter().map(|point| point.visits).sum()
    }

    pub fn peak(&self) -> Option<DemandPoint> {
        // Earliest hour wins ties.
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<DemandPoint>, point| match best {
                Some(current) if current.visits >= point.visits => Some(current),
                _ => Some(point),
            })
    }
}

fn truncate_to_hour(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), 0, 0)
        .unwrap_or(timestamp)
}
