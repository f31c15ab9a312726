/// firemon_service: INPE queimadas wildfire detection monitoring service.
///
/// # Module structure
///
/// ```text
/// firemon_service
/// ├── model       — shared data types (DetectionRecord, Criticality, FetchOutcome, …)
/// ├── config      — monitoring configuration loader (monitor.toml)
/// ├── ingest
/// │   ├── inpe    — archive keys: file names, URLs, single-snapshot fetcher
/// │   ├── slots   — 10-minute slot enumeration + concurrent day fan-out
/// │   ├── range   — daily snapshot aggregation over a date range
/// │   ├── loader  — CSV snapshot parsing into detection records
/// │   └── fixtures (test only) — representative snapshot payloads
/// └── risk
///     ├── biomes   — GeoJSON biome polygon index for point lookups
///     └── assessor — per-detection criticality scoring
/// ```

/// Public modules
pub mod config;
pub mod ingest;
pub mod model;
pub mod risk;
