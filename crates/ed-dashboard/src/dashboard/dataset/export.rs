use crate::dashboard::domain::VisitRecord;
use serde::{Serialize, Serializer};
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TABLE_COLUMNS: [&str; 10] = [
    "date",
    "zone",
    "acuity",
    "disposition",
    "length_of_stay",
    "door_to_doc",
    "doc_to_dispo",
    "boarding_time",
    "lwbs",
    "revisit_72h",
];

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    date: String,
    zone: &'a str,
    acuity: &'a str,
    disposition: &'a str,
    length_of_stay: f64,
    door_to_doc: f64,
    doc_to_dispo: f64,
    boarding_time: f64,
    lwbs: u8,
    revisit_72h: u8,
}

impl<'a> From<&'a VisitRecord> for TableRow<'a> {
    fn from(record: &'a VisitRecord) -> Self {
        Self {
            date: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            zone: record.zone.label(),
            acuity: record.acuity.label(),
            disposition: record.disposition.label(),
            length_of_stay: record.length_of_stay,
            door_to_doc: record.door_to_doc,
            doc_to_dispo: record.doc_to_dispo,
            boarding_time: record.boarding_time,
            lwbs: u8::from(record.left_without_being_seen),
            revisit_72h: u8::from(record.revisit_72h),
        }
    }
}

/// JSON and CSV share one row shape: labels for categories, `date`/`lwbs`
/// column names and 0/1 flags.
impl Serialize for VisitRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TableRow::from(self).serialize(serializer)
    }
}

/// Writes the flat visit table with a header row, preserving record order.
/// An empty table still gets its header.
pub fn write_table_csv<W: Write>(records: &[VisitRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(TABLE_COLUMNS)?;
    }
    for record in records {
        csv_writer.serialize(TableRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::{Acuity, Disposition, Zone};
    use chrono::NaiveDate;

    fn record(hour: u32, lwbs: bool) -> VisitRecord {
        VisitRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            zone: Zone::UrgentCareCenter,
            acuity: Acuity::Esi2,
            disposition: Disposition::Admitted,
            length_of_stay: 120.5,
            door_to_doc: 15.0,
            doc_to_dispo: 90.0,
            boarding_time: 0.0,
            left_without_being_seen: lwbs,
            revisit_72h: false,
        }
    }

    #[test]
    fn csv_uses_table_column_names_and_labels() {
        let mut buffer = Vec::new();
        write_table_csv(&[record(9, true), record(10, false)], &mut buffer).expect("csv writes");
        let output = String::from_utf8(buffer).expect("utf8 output");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "date,zone,acuity,disposition,length_of_stay,door_to_doc,doc_to_dispo,boarding_time,lwbs,revisit_72h"
        );
        assert_eq!(
            lines[1],
            "2025-03-01T09:00:00,UCC,ESI2,Admitted,120.5,15.0,90.0,0.0,1,0"
        );
        assert!(lines[2].starts_with("2025-03-01T10:00:00,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_still_writes_header() {
        let mut buffer = Vec::new();
        write_table_csv(&[], &mut buffer).expect("csv writes");
        let output = String::from_utf8(buffer).expect("utf8 output");
        assert_eq!(output.trim_end(), TABLE_COLUMNS.join(","));
    }

    #[test]
    fn json_rows_match_csv_columns() {
        let value = serde_json::to_value(record(9, true)).expect("record serializes");
        let object = value.as_object().expect("row is an object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected = TABLE_COLUMNS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);

        assert_eq!(value["date"], "2025-03-01T09:00:00");
        assert_eq!(value["zone"], "UCC");
        assert_eq!(value["acuity"], "ESI2");
        assert_eq!(value["lwbs"], 1);
        assert_eq!(value["revisit_72h"], 0);
    }
}
