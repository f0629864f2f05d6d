use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Placeholder option value the route form uses for "no airport chosen".
pub const SENTINEL_VALUE: &str = "x";

/// One `<option>` of an airport select, as it stood when the control was
/// enumerated. The snapshot goes stale the moment the continent selection
/// changes again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirportOption {
    /// Underlying option value (site-internal airport id, or the sentinel).
    pub value: String,
    /// Visible label, e.g. "Kingston (KIN)".
    pub label: String,
}

impl AirportOption {
    pub fn is_sentinel(&self) -> bool {
        self.value == SENTINEL_VALUE
    }
}

/// A harvested route distance. The distance is kept as the exact text shown
/// on the result page ("1,204 mi"), never reparsed as a number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub airport: String,
    pub id: String,
    pub distance: String,
    pub departure_continent: String,
    pub arrival_continent: String,
}

/// Incremental CSV sink.
///
/// The header is written at open and every appended record is flushed
/// immediately, so a crash mid-run keeps everything harvested so far.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: String,
    written: usize,
}

const CSV_HEADER: [&str; 5] = [
    "airport",
    "id",
    "distance",
    "departure_continent",
    "arrival_continent",
];

impl CsvSink {
    pub fn create(path: &str) -> Result<Self> {
        // Header goes out eagerly so a run that collects nothing still
        // leaves a well-formed file. Auto-headers are disabled because
        // serialize would otherwise emit a second copy on the first row.
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer,
            path: path.to_string(),
            written: 0,
        })
    }

    pub fn append(&mut self, record: &DistanceRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.written += 1;
        debug!("wrote record #{} to {}", self.written, self.path);
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

/// Read a previously written distance file back into records.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<DistanceRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DistanceRecord> {
        vec![
            DistanceRecord {
                airport: "Kingston (KIN)".to_string(),
                id: "12".to_string(),
                distance: "1,204 mi".to_string(),
                departure_continent: "Bases".to_string(),
                arrival_continent: "Central America".to_string(),
            },
            DistanceRecord {
                airport: "Havana (HAV)".to_string(),
                id: "13".to_string(),
                distance: "987 mi".to_string(),
                departure_continent: "Bases".to_string(),
                arrival_continent: "Central America".to_string(),
            },
        ]
    }

    #[test]
    fn csv_round_trip_preserves_exact_fields() {
        let path = std::env::temp_dir().join("harvester_round_trip.csv");
        let path_str = path.to_str().unwrap();

        let records = sample();
        let mut sink = CsvSink::create(path_str).unwrap();
        for record in &records {
            sink.append(record).unwrap();
        }
        assert_eq!(sink.written(), 2);

        let read_back = read_records(path_str).unwrap();
        assert_eq!(read_back, records);
        // The comma inside the distance must survive quoting untouched.
        assert_eq!(read_back[0].distance, "1,204 mi");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn header_row_matches_expected_columns() {
        let path = std::env::temp_dir().join("harvester_header.csv");
        let path_str = path.to_str().unwrap();

        let mut sink = CsvSink::create(path_str).unwrap();
        sink.append(&sample()[0]).unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(path_str).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "airport,id,distance,departure_continent,arrival_continent"
        );

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn empty_run_still_writes_header() {
        let path = std::env::temp_dir().join("harvester_empty_run.csv");
        let path_str = path.to_str().unwrap();

        let sink = CsvSink::create(path_str).unwrap();
        assert_eq!(sink.written(), 0);
        drop(sink);

        let contents = std::fs::read_to_string(path_str).unwrap();
        assert_eq!(
            contents.trim_end(),
            "airport,id,distance,departure_continent,arrival_continent"
        );
        assert!(read_records(path_str).unwrap().is_empty());

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn sentinel_detection() {
        let sentinel = AirportOption {
            value: "x".to_string(),
            label: "-- select --".to_string(),
        };
        let real = AirportOption {
            value: "12".to_string(),
            label: "Kingston (KIN)".to_string(),
        };
        assert!(sentinel.is_sentinel());
        assert!(!real.is_sentinel());
    }
}
