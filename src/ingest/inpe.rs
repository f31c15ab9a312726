/// INPE queimadas CSV archive client: key/URL construction + single-file fetcher.
///
/// The archive publishes one CSV per day and one per 10-minute slot:
///   daily:  focos_diario_br_<YYYYMMDD>.csv
///   10-min: focos_10min_<YYYYMMDD>_<HHMM>.csv
///
/// File names are reproduced bit-exact here because they double as the local
/// cache layout: the same key always maps to the same file on disk, so a
/// re-fetch simply overwrites the previous snapshot.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::model::FetchOutcome;

// ---------------------------------------------------------------------------
// Fetch keys
// ---------------------------------------------------------------------------

/// A 10-minute slot boundary within a day. The archive publishes 144 slots
/// per day, at minutes 0, 10, 20, 30, 40, 50 of each hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotTime {
    hour: u8,
    minute: u8,
}

impl SlotTime {
    /// Returns `None` for an hour outside 0-23 or a minute that is not a
    /// multiple of 10. An invalid slot is a normal branch, not a panic.
    pub fn new(hour: u8, minute: u8) -> Option<SlotTime> {
        if hour < 24 && minute < 60 && minute % 10 == 0 {
            Some(SlotTime { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

/// Identifies one remote snapshot: a date, optionally narrowed to a
/// 10-minute slot. Derives both the remote URL and the local cache path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub date: NaiveDate,
    pub slot: Option<SlotTime>,
}

impl FetchKey {
    /// Key for the daily Brazil-wide snapshot.
    pub fn daily(date: NaiveDate) -> FetchKey {
        FetchKey { date, slot: None }
    }

    /// Key for a 10-minute slot snapshot. `None` if the minute is not a
    /// multiple of 10.
    pub fn slot(date: NaiveDate, hour: u8, minute: u8) -> Option<FetchKey> {
        SlotTime::new(hour, minute).map(|slot| FetchKey {
            date,
            slot: Some(slot),
        })
    }

    /// Archive file name for this key. Identical keys produce byte-identical
    /// names across runs, which is what makes the local cache idempotent.
    pub fn file_name(&self) -> String {
        let date = self.date.format("%Y%m%d");
        match self.slot {
            None => format!("focos_diario_br_{}.csv", date),
            Some(slot) => format!(
                "focos_10min_{}_{:02}{:02}.csv",
                date,
                slot.hour(),
                slot.minute()
            ),
        }
    }

    /// Full remote URL under the configured archive base.
    pub fn remote_url(&self, config: &MonitorConfig) -> String {
        let base = match self.slot {
            None => &config.daily_base_url,
            Some(_) => &config.ten_min_base_url,
        };
        if base.ends_with('/') {
            format!("{}{}", base, self.file_name())
        } else {
            format!("{}/{}", base, self.file_name())
        }
    }

    /// Local cache path under the configured raw-data directory.
    pub fn local_path(&self, config: &MonitorConfig) -> PathBuf {
        config.raw_data_dir.join(self.file_name())
    }
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Builds the blocking HTTP client shared by all fetch tasks. The per-request
/// timeout bounds how long one stalled download can hold a pool worker.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Fetches one snapshot into the local cache.
///
/// Classification of failures:
/// - HTTP 404 → `NotFound` (the archive simply has no file for this key yet)
/// - timeout or any other transport/HTTP failure → `Transient`
/// - any local filesystem failure → `Io`
///
/// The body is written to a `.part` file and atomically renamed into place,
/// so a partial transfer never leaves a file the loader would mistake for a
/// complete snapshot. No internal retries: retry policy belongs to callers.
pub fn fetch_csv(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    key: &FetchKey,
) -> FetchOutcome {
    if let Err(e) = fs::create_dir_all(&config.raw_data_dir) {
        return FetchOutcome::Io(format!(
            "cannot create {}: {}",
            config.raw_data_dir.display(),
            e
        ));
    }

    let url = key.remote_url(config);
    let response = match client.get(&url).send() {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return FetchOutcome::Transient(format!("request timed out: {}", url));
        }
        Err(e) => return FetchOutcome::Transient(format!("request failed: {}", e)),
    };

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return FetchOutcome::NotFound;
    }
    if !response.status().is_success() {
        return FetchOutcome::Transient(format!("HTTP {} from {}", response.status(), url));
    }

    // Pull the full body before touching the filesystem, so a mid-transfer
    // network failure stays classified as Transient rather than Io.
    let body = match response.bytes() {
        Ok(body) => body,
        Err(e) => return FetchOutcome::Transient(format!("body transfer failed: {}", e)),
    };

    let final_path = key.local_path(config);
    let part_path = final_path.with_extension("csv.part");

    if let Err(e) = fs::write(&part_path, &body) {
        let _ = fs::remove_file(&part_path);
        return FetchOutcome::Io(format!("cannot write {}: {}", part_path.display(), e));
    }
    if let Err(e) = fs::rename(&part_path, &final_path) {
        let _ = fs::remove_file(&part_path);
        return FetchOutcome::Io(format!(
            "cannot move snapshot into place at {}: {}",
            final_path.display(),
            e
        ));
    }

    FetchOutcome::Success {
        path: final_path,
        bytes: body.len() as u64,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
