/// Daily date-range aggregation.
///
/// Fetches the daily snapshot for every day in an inclusive range, one
/// fetch task per day over a bounded pool, and concatenates the parsed
/// rows in date order. A day that is absent from the archive is skipped
/// silently (counted, not warned); a day that fails to fetch or parse
/// becomes a warning in the report without aborting the batch. The only
/// terminal failures are an inverted range and the pathological case
/// where every single day failed with a local storage error.

use chrono::NaiveDate;
use std::sync::mpsc;
use threadpool::ThreadPool;

use crate::config::MonitorConfig;
use crate::ingest::inpe::{self, FetchKey};
use crate::ingest::loader;
use crate::model::{DetectionRecord, FetchOutcome, LoadError, RangeError};

/// Outcome of a date-range aggregation. `records` may be empty - a range
/// with no registered detections is a valid result, not an error - and
/// `warnings` distinguishes "no data" from "partial fetch failure".
#[derive(Debug, Default)]
pub struct RangeReport {
    /// All parsed detections, concatenated in date order (no re-sort).
    pub records: Vec<DetectionRecord>,
    /// Days whose snapshot existed and contained at least one row.
    pub days_with_data: usize,
    /// Days with no snapshot or an empty one.
    pub days_missing: usize,
    /// One entry per day that failed to fetch or parse.
    pub warnings: Vec<String>,
}

impl RangeReport {
    /// True when the whole range produced nothing - no rows and no
    /// failures worth reporting.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.warnings.is_empty()
    }
}

/// Per-day outcome collected from the worker pool.
#[derive(Debug)]
pub(crate) enum DayResult {
    Rows(Vec<DetectionRecord>),
    Missing,
    Failed { cause: String, local: bool },
}

/// Fetches and combines daily snapshots for `start..=end`.
pub fn fetch_range(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeReport, RangeError> {
    if start > end {
        return Err(RangeError::InvalidRange { start, end });
    }

    let days = enumerate_days(start, end);
    let pool = ThreadPool::new(days.len().min(config.fetch_concurrency).max(1));
    let (tx, rx) = mpsc::channel();

    for (idx, date) in days.iter().copied().enumerate() {
        let tx = tx.clone();
        let client = client.clone();
        let config = config.clone();

        pool.execute(move || {
            let key = FetchKey::daily(date);
            let result = match inpe::fetch_csv(&client, &config, &key) {
                FetchOutcome::Success { path, .. } => match loader::parse_csv(&path) {
                    Ok(rows) => DayResult::Rows(rows),
                    Err(e) => parse_failure(e),
                },
                FetchOutcome::NotFound => DayResult::Missing,
                FetchOutcome::Transient(cause) => DayResult::Failed {
                    cause,
                    local: false,
                },
                FetchOutcome::Io(cause) => DayResult::Failed { cause, local: true },
            };
            let _ = tx.send((idx, result));
        });
    }
    drop(tx);

    let mut outcomes: Vec<(usize, DayResult)> = rx.iter().collect();
    outcomes.sort_by_key(|(idx, _)| *idx);

    assemble_report(&days, outcomes.into_iter().map(|(_, r)| r).collect())
}

/// Classifies a parse failure on a downloaded snapshot. Only a local read
/// failure counts toward the all-days storage terminal state; a snapshot
/// that downloaded fine but is malformed is the archive's problem and
/// stays a per-day warning.
pub(crate) fn parse_failure(error: LoadError) -> DayResult {
    let local = matches!(error, LoadError::Io(_));
    DayResult::Failed {
        cause: error.to_string(),
        local,
    }
}

/// Folds per-day outcomes (already in date order) into a report, or into
/// the terminal all-days-failed-locally error.
pub(crate) fn assemble_report(
    days: &[NaiveDate],
    outcomes: Vec<DayResult>,
) -> Result<RangeReport, RangeError> {
    let mut report = RangeReport::default();
    let mut local_failures = 0usize;
    let mut first_local_cause: Option<String> = None;

    for (date, outcome) in days.iter().zip(outcomes) {
        match outcome {
            DayResult::Rows(rows) if !rows.is_empty() => {
                report.days_with_data += 1;
                report.records.extend(rows);
            }
            DayResult::Rows(_) => {
                // Snapshot existed but registered no detections
                report.days_missing += 1;
            }
            DayResult::Missing => {
                report.days_missing += 1;
            }
            DayResult::Failed { cause, local } => {
                if local {
                    local_failures += 1;
                    first_local_cause.get_or_insert_with(|| cause.clone());
                }
                report
                    .warnings
                    .push(format!("{}: {}", date.format("%Y-%m-%d"), cause));
            }
        }
    }

    if !days.is_empty() && local_failures == days.len() {
        return Err(RangeError::StorageFailure(
            first_local_cause.unwrap_or_else(|| "unknown storage failure".to_string()),
        ));
    }

    Ok(report)
}

/// All days in `start..=end`, inclusive on both ends.
pub(crate) fn enumerate_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break, // end of representable dates
        }
    }
    days
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures;
    use crate::ingest::loader::parse_csv_text;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_invalid_range_is_usage_error() {
        let config = MonitorConfig::default();
        let client = inpe::http_client(1).unwrap();

        let result = fetch_range(&client, &config, day(10), day(5));
        assert_eq!(
            result.unwrap_err(),
            RangeError::InvalidRange {
                start: day(10),
                end: day(5),
            }
        );
    }

    #[test]
    fn test_enumerate_days_inclusive() {
        assert_eq!(enumerate_days(day(5), day(5)), vec![day(5)]);
        assert_eq!(enumerate_days(day(5), day(7)), vec![day(5), day(6), day(7)]);
    }

    #[test]
    fn test_missing_middle_day_is_partial_success() {
        // Scenario: 3-day range, day 2 absent from the archive
        let days = [day(1), day(2), day(3)];
        let rows = parse_csv_text(fixtures::fixture_daily_utf8()).unwrap();
        let per_day = rows.len();

        let outcomes = vec![
            DayResult::Rows(rows.clone()),
            DayResult::Missing,
            DayResult::Rows(rows),
        ];

        let report = assemble_report(&days, outcomes).unwrap();
        assert_eq!(report.records.len(), per_day * 2);
        assert_eq!(report.days_with_data, 2);
        assert_eq!(report.days_missing, 1);
        assert!(report.warnings.is_empty(), "absence is not a failure");
    }

    #[test]
    fn test_transient_failure_becomes_warning_not_abort() {
        let days = [day(1), day(2)];
        let rows = parse_csv_text(fixtures::fixture_daily_utf8()).unwrap();

        let outcomes = vec![
            DayResult::Rows(rows),
            DayResult::Failed {
                cause: "request timed out".to_string(),
                local: false,
            },
        ];

        let report = assemble_report(&days, outcomes).unwrap();
        assert!(!report.records.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("2024-08-02"));
    }

    #[test]
    fn test_all_days_local_failure_is_terminal() {
        let days = [day(1), day(2)];
        let outcomes = vec![
            DayResult::Failed {
                cause: "disk full".to_string(),
                local: true,
            },
            DayResult::Failed {
                cause: "disk full".to_string(),
                local: true,
            },
        ];

        let result = assemble_report(&days, outcomes);
        assert!(matches!(result, Err(RangeError::StorageFailure(_))));
    }

    #[test]
    fn test_malformed_snapshot_is_not_a_storage_failure() {
        // Download succeeded, content is garbage: the archive's problem
        assert!(matches!(
            parse_failure(LoadError::Malformed("unreadable header row".to_string())),
            DayResult::Failed { local: false, .. }
        ));
        // Could not read the file back: our problem
        assert!(matches!(
            parse_failure(LoadError::Io("permission denied".to_string())),
            DayResult::Failed { local: true, .. }
        ));
    }

    #[test]
    fn test_every_day_malformed_is_warnings_not_terminal() {
        let days = [day(1), day(2)];
        let outcomes = vec![
            parse_failure(LoadError::Malformed("unreadable header row".to_string())),
            parse_failure(LoadError::Malformed("unreadable header row".to_string())),
        ];

        let report = assemble_report(&days, outcomes).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_all_days_absent_is_empty_report_not_error() {
        let days = [day(1), day(2), day(3)];
        let outcomes = vec![DayResult::Missing, DayResult::Missing, DayResult::Missing];

        let report = assemble_report(&days, outcomes).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.days_missing, 3);
    }

    #[test]
    fn test_rows_concatenated_in_date_order() {
        let days = [day(1), day(2)];
        let day1 = parse_csv_text(fixtures::fixture_slot_alias_headers()).unwrap();
        let day2 = parse_csv_text(fixtures::fixture_daily_utf8()).unwrap();
        let (n1, n2) = (day1.len(), day2.len());

        let report =
            assemble_report(&days, vec![DayResult::Rows(day1), DayResult::Rows(day2)]).unwrap();
        assert_eq!(report.records.len(), n1 + n2);
        // Day 1 rows come first even though day 2 might have finished earlier
        assert_eq!(report.records[0].latitude, Some(-9.4501));
        assert_eq!(report.records[n1].latitude, Some(-3.1025));
    }
}
