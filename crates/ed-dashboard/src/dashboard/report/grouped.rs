use super::summary::{KpiAccumulator, KpiSummary};
use crate::dashboard::domain::{Dimension, VisitRecord};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRow<D: Dimension> {
    pub key: D,
    pub label: &'static str,
    #[serde(flatten)]
    pub summary: KpiSummary,
}

/// Per-category KPIs with one row for every member of the category set, in
/// its natural order. Categories without visits keep their row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate<D: Dimension> {
    pub dimension: &'static str,
    pub rows: Vec<GroupedRow<D>>,
}

impl<D: Dimension> GroupedAggregate<D> {
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a VisitRecord>,
    {
        let mut groups: HashMap<D, KpiAccumulator> = HashMap::new();
        for record in records {
            groups.entry(D::of(record)).or_default().push(record);
        }

        let rows = D::ordered()
            .iter()
            .map(|&key| GroupedRow {
                key,
                label: key.label(),
                summary: groups
                    .get(&key)
                    .map(KpiAccumulator::finish)
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            dimension: D::NAME,
            rows,
        }
    }

    pub fn row(&self, key: D) -> Option<&GroupedRow<D>> {
        self.rows.iter().find(|row| row.key == key)
    }
}
