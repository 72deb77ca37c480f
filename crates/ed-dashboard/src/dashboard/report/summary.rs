use crate::dashboard::domain::VisitRecord;
use serde::Serialize;

/// The seven headline KPIs for one slice of visits.
///
/// Means over an empty slice are `None` rather than zero so a dashboard can
/// tell "no data" apart from a real value. The boarding mean only considers
/// visits that were actually boarded. Rates are percentages and fall back to
/// zero for an empty slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub visits: usize,
    pub avg_length_of_stay: Option<f64>,
    pub avg_door_to_doc: Option<f64>,
    pub avg_doc_to_dispo: Option<f64>,
    pub avg_boarding_time: Option<f64>,
    pub lwbs_rate: f64,
    pub revisit_rate: f64,
}

impl KpiSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a VisitRecord>,
    {
        let mut accumulator = KpiAccumulator::default();
        for record in records {
            accumulator.push(record);
        }
        accumulator.finish()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct KpiAccumulator {
    visits: usize,
    length_of_stay: f64,
    door_to_doc: f64,
    doc_to_dispo: f64,
    boarded: usize,
    boarding_time: f64,
    lwbs: usize,
    revisits: usize,
}

impl KpiAccumulator {
    pub(crate) fn push(&mut self, record: &VisitRecord) {
        self.visits += 1;
        self.length_of_stay += record.length_of_stay;
        self.door_to_doc += record.door_to_doc;
        self.doc_to_dispo += record.doc_to_dispo;
        if record.boarded() {
            self.boarded += 1;
            self.boarding_time += record.boarding_time;
        }
        if record.left_without_being_seen {
            self.lwbs += 1;
        }
        if record.revisit_72h {
            self.revisits += 1;
        }
    }

    pub(crate) fn finish(&self) -> KpiSummary {
        KpiSummary {
            visits: self.visits,
            avg_length_of_stay: mean(self.length_of_stay, self.visits),
            avg_door_to_doc: mean(self.door_to_doc, self.visits),
            avg_doc_to_dispo: mean(self.doc_to_dispo, self.visits),
            avg_boarding_time: mean(self.boarding_time, self.boarded),
            lwbs_rate: percentage(self.lwbs, self.visits),
            revisit_rate: percentage(self.revisits, self.visits),
        }
    }
}

fn mean(total: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

fn percentage(hits: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        hits as f64 / count as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::{Acuity, Disposition, Zone};
    use chrono::NaiveDate;

    fn visit(los: f64, boarding: f64, lwbs: bool, revisit: bool) -> VisitRecord {
        VisitRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            zone: Zone::Protocol,
            acuity: Acuity::Esi3,
            disposition: Disposition::Discharged,
            length_of_stay: los,
            door_to_doc: 10.0,
            doc_to_dispo: 100.0,
            boarding_time: boarding,
            left_without_being_seen: lwbs,
            revisit_72h: revisit,
        }
    }

    #[test]
    fn empty_slice_reports_unavailable_means_and_zero_rates() {
        let none: Vec<VisitRecord> = Vec::new();
        let summary = KpiSummary::from_records(&none);
        assert_eq!(summary, KpiSummary::default());
        assert_eq!(summary.visits, 0);
        assert!(summary.avg_length_of_stay.is_none());
        assert!(summary.avg_boarding_time.is_none());
        assert_eq!(summary.lwbs_rate, 0.0);
    }

    #[test]
    fn boarding_mean_skips_unboarded_visits() {
        let visits = [
            visit(100.0, 0.0, false, false),
            visit(200.0, 30.0, true, false),
            visit(300.0, 90.0, false, true),
            visit(400.0, 0.0, false, false),
        ];
        let summary = KpiSummary::from_records(&visits);

        assert_eq!(summary.visits, 4);
        assert_eq!(summary.avg_length_of_stay, Some(250.0));
        assert_eq!(summary.avg_door_to_doc, Some(10.0));
        assert_eq!(summary.avg_doc_to_dispo, Some(100.0));
        assert_eq!(summary.avg_boarding_time, Some(60.0));
        assert_eq!(summary.lwbs_rate, 25.0);
        assert_eq!(summary.revisit_rate, 25.0);
    }

    #[test]
    fn no_boarded_visits_leaves_boarding_unavailable() {
        let visits = [visit(100.0, 0.0, false, false)];
        let summary = KpiSummary::from_records(&visits);
        assert_eq!(summary.avg_length_of_stay, Some(100.0));
        assert!(summary.avg_boarding_time.is_none());
    }
}
