use super::DatasetError;
use crate::dashboard::domain::{Acuity, Dimension, Disposition, VisitRecord, Zone};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution, Normal};

const LENGTH_OF_STAY: (f64, f64) = (180.0, 60.0);
const DOOR_TO_DOC: (f64, f64) = (20.0, 10.0);
const DOC_TO_DISPO: (f64, f64) = (150.0, 50.0);
const BOARDING_TIME: (f64, f64) = (60.0, 30.0);
const BOARDED_PROBABILITY: f64 = 0.5;
const LWBS_PROBABILITY: f64 = 0.1;
const REVISIT_PROBABILITY: f64 = 0.05;

struct VisitSampler {
    length_of_stay: Normal<f64>,
    door_to_doc: Normal<f64>,
    doc_to_dispo: Normal<f64>,
    boarding_time: Normal<f64>,
    boarded: Bernoulli,
    lwbs: Bernoulli,
    revisit: Bernoulli,
}

impl VisitSampler {
    fn new() -> Result<Self, DatasetError> {
        Ok(Self {
            length_of_stay: normal(LENGTH_OF_STAY)?,
            door_to_doc: normal(DOOR_TO_DOC)?,
            doc_to_dispo: normal(DOC_TO_DISPO)?,
            boarding_time: normal(BOARDING_TIME)?,
            boarded: bernoulli(BOARDED_PROBABILITY)?,
            lwbs: bernoulli(LWBS_PROBABILITY)?,
            revisit: bernoulli(REVISIT_PROBABILITY)?,
        })
    }

    fn sample<R: Rng>(&self, rng: &mut R, timestamp: NaiveDateTime, zone: Zone) -> VisitRecord {
        let acuity = pick(rng, Acuity::ordered());
        let disposition = pick(rng, Disposition::ordered());
        let length_of_stay = minutes(&self.length_of_stay, rng);
        let door_to_doc = minutes(&self.door_to_doc, rng);
        let doc_to_dispo = minutes(&self.doc_to_dispo, rng);
        let boarding_candidate = minutes(&self.boarding_time, rng);
        let boarding_time = if self.boarded.sample(rng) {
            boarding_candidate
        } else {
            0.0
        };

        VisitRecord {
            timestamp,
            zone,
            acuity,
            disposition,
            length_of_stay,
            door_to_doc,
            doc_to_dispo,
            boarding_time,
            left_without_being_seen: self.lwbs.sample(rng),
            revisit_72h: self.revisit.sample(rng),
        }
    }
}

pub(super) fn generate(
    start: NaiveDate,
    end: NaiveDate,
    seed: Option<u64>,
) -> Result<Vec<VisitRecord>, DatasetError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampler = VisitSampler::new()?;
    let hours = hourly_window(start, end);

    let mut records = Vec::with_capacity(hours.len() * Zone::ordered().len());
    for &zone in Zone::ordered() {
        for &timestamp in &hours {
            records.push(sampler.sample(&mut rng, timestamp, zone));
        }
    }

    Ok(records)
}

/// Every hour from midnight of `start` up to and including midnight of `end`.
fn hourly_window(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDateTime> {
    let first = start.and_time(chrono::NaiveTime::MIN);
    let last = end.and_time(chrono::NaiveTime::MIN);

    let mut hours = Vec::new();
    let mut current = first;
    while current <= last {
        hours.push(current);
        current += Duration::hours(1);
    }
    hours
}

fn pick<R: Rng, T: Copy>(rng: &mut R, options: &[T]) -> T {
    options[rng.gen_range(0..options.len())]
}

fn minutes<R: Rng>(distribution: &Normal<f64>, rng: &mut R) -> f64 {
    distribution.sample(rng).max(0.0)
}

fn normal((mean, std_dev): (f64, f64)) -> Result<Normal<f64>, DatasetError> {
    Normal::new(mean, std_dev).map_err(|err| DatasetError::Distribution(err.to_string()))
}

fn bernoulli(p: f64) -> Result<Bernoulli, DatasetError> {
    Bernoulli::new(p).map_err(|err| DatasetError::Distribution(err.to_string()))
}
