/// Shared data types for the fire-detection pipeline.
///
/// These types cross module boundaries: the ingest layer produces
/// `FetchOutcome`s and `DetectionRecord`s, the risk layer attaches
/// `CriticalityAssessment`s, and the binary renders the result.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fetch outcomes
// ---------------------------------------------------------------------------

/// Result classification for a single remote-snapshot retrieval attempt.
///
/// `NotFound` is an expected, non-exceptional branch: many 10-minute slots
/// legitimately have no published file yet. Only `Io` indicates a problem
/// on our side of the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Snapshot downloaded and persisted at `path`.
    Success { path: PathBuf, bytes: u64 },
    /// Remote archive has no file for this key (HTTP 404).
    NotFound,
    /// Network-level failure (timeout, connection error, non-404 HTTP error).
    /// Retryable by caller policy; the fetcher never retries internally.
    Transient(String),
    /// Local storage failure while persisting the snapshot.
    Io(String),
}

// ---------------------------------------------------------------------------
// Detection records
// ---------------------------------------------------------------------------

/// One fire-detection row from a parsed INPE CSV snapshot.
///
/// Every semantic field is nullable: INPE files vary across years in both
/// column spelling and completeness, and a row with an unparsable value
/// keeps the row with that field set to `None` rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionRecord {
    /// Detection time (UTC). `None` when the timestamp column is missing
    /// or unparsable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Latitude in [-90, 90]; out-of-range values are nulled at parse time.
    pub latitude: Option<f64>,
    /// Longitude in [-180, 180]; out-of-range values are nulled at parse time.
    pub longitude: Option<f64>,
    /// Fire radiative power in MW.
    pub frp: Option<f64>,
    /// Biome name as published in the snapshot (daily files carry it,
    /// 10-minute files usually do not).
    pub biome: Option<String>,
    // Passthrough fields, not interpreted by the pipeline
    pub state: Option<String>,
    pub municipality: Option<String>,
    pub satellite: Option<String>,
    /// Risk assessment attached by the classifier.
    pub assessment: Option<CriticalityAssessment>,
    /// Biome resolved by polygon lookup when the row had no explicit biome.
    /// Diagnostic field for the presentation layer.
    pub geo_biome: Option<String>,
}

// ---------------------------------------------------------------------------
// Criticality
// ---------------------------------------------------------------------------

/// Risk tier for a single detection. Variant order defines severity
/// ordering, so `max` picks the stronger tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

impl Criticality {
    /// All tiers in ascending severity, for summary tables.
    pub const ALL: [Criticality; 4] = [
        Criticality::Low,
        Criticality::Medium,
        Criticality::High,
        Criticality::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "Low",
            Criticality::Medium => "Medium",
            Criticality::High => "High",
            Criticality::Critical => "Critical",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier plus the ordered list of reasons that produced it.
/// Always carries at least one reason string.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalityAssessment {
    pub tier: Criticality,
    pub reasons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure while parsing a fetched snapshot into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Could not read the local file.
    Io(String),
    /// File content is not a usable CSV (e.g. unreadable header row).
    Malformed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(cause) => write!(f, "I/O error reading snapshot: {}", cause),
            LoadError::Malformed(cause) => write!(f, "malformed snapshot: {}", cause),
        }
    }
}

impl std::error::Error for LoadError {}

/// Terminal failure of a date-range aggregation. Individual day failures
/// are reported as warnings inside `RangeReport`, not through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Caller precondition violated: start date after end date.
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    /// Every day in the range failed with a local storage error.
    StorageFailure(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::InvalidRange { start, end } => {
                write!(f, "invalid date range: start {} is after end {}", start, end)
            }
            RangeError::StorageFailure(cause) => {
                write!(f, "local storage failure across entire range: {}", cause)
            }
        }
    }
}

impl std::error::Error for RangeError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
