/// 10-minute slot enumeration and concurrent day-level fan-out.
///
/// A day has 144 fixed slots (every 10 minutes). Fetching them one at a
/// time against a 60-second timeout would take most of an hour in the
/// worst case, so all slots fan out over a bounded worker pool and results
/// fan back in over a channel. Each slot's outcome is isolated: a missing
/// or failed slot never aborts the others, and an empty slot (no fire
/// detections in that 10-minute window, a very common case) is filtered
/// out rather than surfaced as an error.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use threadpool::ThreadPool;

use crate::config::MonitorConfig;
use crate::ingest::inpe::{self, FetchKey};
use crate::ingest::loader;
use crate::model::{DetectionRecord, FetchOutcome};

/// Enumerates all 144 slot keys for a day, in slot order (00:00 → 23:50).
pub fn enumerate_day_slots(date: NaiveDate) -> Vec<FetchKey> {
    let mut keys = Vec::with_capacity(144);
    for hour in 0..24u8 {
        for minute in [0u8, 10, 20, 30, 40, 50] {
            // The cadence is fixed, so every key here is valid
            if let Some(key) = FetchKey::slot(date, hour, minute) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Fetches all 144 slot snapshots for a day concurrently and returns the
/// local paths of those that exist and contain at least one data row,
/// in slot order regardless of completion order.
///
/// Concurrency is capped by `fetch_concurrency`; each worker also runs the
/// emptiness check on its own snapshot, keeping that file I/O off the
/// scheduling path. Transient and I/O failures are reported to stderr and
/// the slot is skipped.
pub fn fetch_all_slots(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    date: NaiveDate,
) -> Vec<PathBuf> {
    let keys = enumerate_day_slots(date);
    let pool = ThreadPool::new(config.fetch_concurrency.max(1));
    let (tx, rx) = mpsc::channel();

    for (idx, key) in keys.into_iter().enumerate() {
        let tx = tx.clone();
        let client = client.clone();
        let config = config.clone();

        pool.execute(move || {
            let path = match inpe::fetch_csv(&client, &config, &key) {
                FetchOutcome::Success { path, .. } => {
                    if has_data_rows(&path) {
                        Some(path)
                    } else {
                        None // published but no detections: same as absent
                    }
                }
                FetchOutcome::NotFound => None,
                FetchOutcome::Transient(cause) => {
                    eprintln!("   ✗ slot {} fetch failed: {}", key.file_name(), cause);
                    None
                }
                FetchOutcome::Io(cause) => {
                    eprintln!("   ✗ slot {} storage error: {}", key.file_name(), cause);
                    None
                }
            };
            // Receiver hangs up only if the caller panicked; nothing to do then
            let _ = tx.send((idx, path));
        });
    }
    drop(tx);

    let mut found: Vec<(usize, PathBuf)> = rx
        .iter()
        .filter_map(|(idx, path)| path.map(|p| (idx, p)))
        .collect();
    found.sort_by_key(|(idx, _)| *idx);
    found.into_iter().map(|(_, path)| path).collect()
}

/// True if the snapshot has at least one data row past the CSV header.
/// A zero-byte or header-only file means "no detections in this window".
pub fn has_data_rows(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        _ => return false,
    }
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    matches!(reader.records().next(), Some(Ok(_)))
}

/// Fetches and parses all slot data for one day into a single dataset,
/// newest detections first (rows without a parsable timestamp sort last).
pub fn load_day_slots(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    date: NaiveDate,
) -> Vec<DetectionRecord> {
    let paths = fetch_all_slots(client, config, date);
    println!(
        "   {} slot file(s) with data for {}",
        paths.len(),
        date.format("%Y-%m-%d")
    );

    let mut records = Vec::new();
    for path in paths {
        match loader::parse_csv(&path) {
            Ok(rows) => records.extend(rows),
            Err(e) => eprintln!("   ✗ failed to parse {}: {}", path.display(), e),
        }
    }

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
