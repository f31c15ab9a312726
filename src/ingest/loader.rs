/// Snapshot parser: INPE CSV files → DetectionRecords.
///
/// The archive's CSVs are inconsistent across years: the timestamp column
/// has three historical spellings, coordinates appear as both `lat`/`lon`
/// and `latitude`/`longitude`, and older files are Latin-1 encoded while
/// newer ones are UTF-8. All of that is normalized here, once, at parse
/// time, so the rest of the pipeline sees a single fixed record shape.
///
/// Parsing is deliberately lenient per field: a row with a garbled FRP or
/// an out-of-range coordinate keeps the row with that field nulled. Only a
/// file whose header row cannot be read at all is rejected.

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use std::fs;
use std::path::Path;

use crate::model::{DetectionRecord, LoadError};

/// Parses a fetched snapshot from the local cache.
pub fn parse_csv(path: &Path) -> Result<Vec<DetectionRecord>, LoadError> {
    let raw = fs::read(path).map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
    let text = decode_text(&raw);
    parse_csv_text(&text)
}

/// Parses CSV content that has already been decoded to a string.
pub fn parse_csv_text(text: &str) -> Result<Vec<DetectionRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Malformed(format!("unreadable header row: {}", e)))?
        .clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(_) => continue, // ragged or unreadable row
        };
        records.push(columns.record_from(&row));
    }
    Ok(records)
}

/// Decodes snapshot bytes: UTF-8 first, then Latin-1. The fallback chain is
/// fixed at those two because they are the only encodings the archive has
/// ever published; Latin-1 maps every byte to the same code point, so the
/// second step cannot fail.
pub fn decode_text(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

/// Parses an INPE timestamp as UTC. The archive publishes GMT wall-clock
/// times in two delimiter variants; RFC 3339 covers exported re-feeds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Header alias normalization
// ---------------------------------------------------------------------------

/// Column indexes after alias resolution. Built once per file from the
/// header row; row parsing is then pure index lookups.
struct ColumnMap {
    timestamp: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    frp: Option<usize>,
    biome: Option<usize>,
    state: Option<usize>,
    municipality: Option<usize>,
    satellite: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> ColumnMap {
        let mut map = ColumnMap {
            timestamp: None,
            latitude: None,
            longitude: None,
            frp: None,
            biome: None,
            state: None,
            municipality: None,
            satellite: None,
        };

        for (idx, name) in headers.iter().enumerate() {
            // First spelling wins, matching the archive's column precedence
            match name.trim().to_lowercase().as_str() {
                "datahora" | "data_hora_gmt" | "data" => {
                    map.timestamp.get_or_insert(idx);
                }
                "lat" | "latitude" => {
                    map.latitude.get_or_insert(idx);
                }
                "lon" | "longitude" => {
                    map.longitude.get_or_insert(idx);
                }
                "frp" => {
                    map.frp.get_or_insert(idx);
                }
                "bioma" | "biome" => {
                    map.biome.get_or_insert(idx);
                }
                "estado" | "state" => {
                    map.state.get_or_insert(idx);
                }
                "municipio" | "municipality" => {
                    map.municipality.get_or_insert(idx);
                }
                "satelite" | "satellite" => {
                    map.satellite.get_or_insert(idx);
                }
                _ => {}
            }
        }

        map
    }

    fn record_from(&self, row: &StringRecord) -> DetectionRecord {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        DetectionRecord {
            timestamp: field(self.timestamp).and_then(parse_timestamp),
            latitude: field(self.latitude)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| (-90.0..=90.0).contains(v)),
            longitude: field(self.longitude)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| (-180.0..=180.0).contains(v)),
            frp: field(self.frp).and_then(|s| s.parse::<f64>().ok()),
            biome: field(self.biome).map(str::to_string),
            state: field(self.state).map(str::to_string),
            municipality: field(self.municipality).map(str::to_string),
            satellite: field(self.satellite).map(str::to_string),
            assessment: None,
            geo_biome: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
