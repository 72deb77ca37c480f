use crate::dashboard::dataset::VisitDataset;
use crate::dashboard::domain::{Acuity, Dimension, Disposition, Zone};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to parse '{value}' as a date (YYYY-MM-DD) or date-time (YYYY-MM-DDTHH:MM:SS)")]
    InvalidDate { value: String },
}

/// Inputs of one dashboard refresh: an inclusive time window and the three
/// dropdown selections, passed through as raw labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub zone: String,
    pub acuity: String,
    pub disposition: String,
}

impl ReportQuery {
    /// The state a freshly loaded dashboard starts in: the whole dataset and
    /// the first option of every dropdown.
    pub fn defaults(dataset: &VisitDataset) -> Self {
        let (start, end) = dataset.time_bounds().unwrap_or_default();
        Self {
            start,
            end,
            zone: first_label::<Zone>(),
            acuity: first_label::<Acuity>(),
            disposition: first_label::<Disposition>(),
        }
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

fn first_label<D: Dimension>() -> String {
    D::ordered()
        .first()
        .map(|value| value.label().to_string())
        .unwrap_or_default()
}

/// Selections after matching against the fixed category sets. `None` means the
/// submitted value is not a member, so the matching slice is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub zone: Option<Zone>,
    pub acuity: Option<Acuity>,
    pub disposition: Option<Disposition>,
}

impl ResolvedSelection {
    pub fn resolve(query: &ReportQuery) -> Self {
        Self {
            zone: Zone::parse(&query.zone),
            acuity: Acuity::parse(&query.acuity),
            disposition: Disposition::parse(&query.disposition),
        }
    }
}

/// Parses a window bound the way the date picker submits it. Plain dates
/// resolve to midnight.
pub fn parse_bound(raw: &str) -> Result<NaiveDateTime, QueryError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| QueryError::InvalidDate {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_bound_accepts_picker_formats() {
        assert_eq!(parse_bound("2025-03-04").expect("date"), at(4, 0));
        assert_eq!(parse_bound("2025-03-04T13:00:00").expect("naive"), at(4, 13));
        assert_eq!(parse_bound(" 2025-03-04 13:00:00 ").expect("spaced"), at(4, 13));
        assert_eq!(parse_bound("2025-03-04T13:00:00Z").expect("rfc3339"), at(4, 13));
    }

    #[test]
    fn parse_bound_rejects_garbage() {
        let err = parse_bound("next tuesday").expect_err("invalid");
        assert!(err.to_string().contains("next tuesday"));
        assert!(parse_bound("").is_err());
    }

    #[test]
    fn window_is_inclusive() {
        let query = ReportQuery {
            start: at(2, 0),
            end: at(3, 0),
            zone: "UCC".into(),
            acuity: "ESI1".into(),
            disposition: "Admitted".into(),
        };
        assert!(query.contains(at(2, 0)));
        assert!(query.contains(at(3, 0)));
        assert!(!query.contains(at(3, 1)));
        assert!(!query.contains(at(1, 23)));
    }

    #[test]
    fn defaults_on_empty_dataset_select_first_options() {
        let query = ReportQuery::defaults(&VisitDataset::from_records(Vec::new()));
        assert_eq!(query.zone, "Adults B1");
        assert_eq!(query.acuity, "ESI1");
        assert_eq!(query.disposition, "Admitted");
        assert_eq!(query.start, query.end);
    }

    #[test]
    fn unknown_selection_resolves_to_none() {
        let query = ReportQuery {
            start: at(1, 0),
            end: at(2, 0),
            zone: "Resus".into(),
            acuity: "esi5".into(),
            disposition: "Transferred".into(),
        };
        let selection = ResolvedSelection::resolve(&query);
        assert_eq!(selection.zone, None);
        assert_eq!(selection.acuity, None);
        assert_eq!(selection.disposition, None);
    }
}
