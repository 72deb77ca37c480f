use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// A fixed, ordered category set that visits can be grouped by.
pub trait Dimension: Copy + Eq + Hash + Serialize + 'static {
    /// Human readable name of the dimension itself.
    const NAME: &'static str;

    fn ordered() -> &'static [Self];

    fn label(self) -> &'static str;

    fn of(record: &VisitRecord) -> Self;

    /// Matches a selection exactly against the category labels. Returns
    /// `None` for values outside the set.
    fn parse(value: &str) -> Option<Self> {
        Self::ordered()
            .iter()
            .copied()
            .find(|candidate| candidate.label() == value)
    }
}

/// Every category serializes as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "Adults B1")]
    AdultsB1,
    Pediatrics,
    Protocol,
    #[serde(rename = "UCC")]
    UrgentCareCenter,
}

impl Zone {
    const ORDERED: [Self; 4] = [
        Self::AdultsB1,
        Self::Pediatrics,
        Self::Protocol,
        Self::UrgentCareCenter,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::AdultsB1 => "Adults B1",
            Self::Pediatrics => "Pediatrics",
            Self::Protocol => "Protocol",
            Self::UrgentCareCenter => "UCC",
        }
    }
}

impl Dimension for Zone {
    const NAME: &'static str = "zone";

    fn ordered() -> &'static [Self] {
        &Self::ORDERED
    }

    fn label(self) -> &'static str {
        Zone::label(self)
    }

    fn of(record: &VisitRecord) -> Self {
        record.zone
    }
}

/// Emergency Severity Index level, `Esi1` being the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Acuity {
    Esi1,
    Esi2,
    Esi3,
    Esi4,
    Esi5,
}

impl Acuity {
    const ORDERED: [Self; 5] = [Self::Esi1, Self::Esi2, Self::Esi3, Self::Esi4, Self::Esi5];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Esi1 => "ESI1",
            Self::Esi2 => "ESI2",
            Self::Esi3 => "ESI3",
            Self::Esi4 => "ESI4",
            Self::Esi5 => "ESI5",
        }
    }
}

impl Dimension for Acuity {
    const NAME: &'static str = "acuity";

    fn ordered() -> &'static [Self] {
        &Self::ORDERED
    }

    fn label(self) -> &'static str {
        Acuity::label(self)
    }

    fn of(record: &VisitRecord) -> Self {
        record.acuity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Admitted,
    Discharged,
}

impl Disposition {
    const ORDERED: [Self; 2] = [Self::Admitted, Self::Discharged];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Admitted => "Admitted",
            Self::Discharged => "Discharged",
        }
    }
}

impl Dimension for Disposition {
    const NAME: &'static str = "disposition";

    fn ordered() -> &'static [Self] {
        &Self::ORDERED
    }

    fn label(self) -> &'static str {
        Disposition::label(self)
    }

    fn of(record: &VisitRecord) -> Self {
        record.disposition
    }
}

/// One emergency department encounter. Durations are in minutes; a
/// `boarding_time` of zero means the patient was not boarded.
///
/// Serializes as a row of the visit table (see `dataset::export`).
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRecord {
    pub timestamp: NaiveDateTime,
    pub zone: Zone,
    pub acuity: Acuity,
    pub disposition: Disposition,
    pub length_of_stay: f64,
    pub door_to_doc: f64,
    pub doc_to_dispo: f64,
    pub boarding_time: f64,
    pub left_without_being_seen: bool,
    pub revisit_72h: bool,
}

impl VisitRecord {
    pub fn boarded(&self) -> bool {
        self.boarding_time > 0.0
    }
}
