/// Integration tests for the detection pipeline
///
/// These tests verify the pieces working together, without the network:
/// 1. Archive key construction is pure and deterministic
/// 2. Snapshot files on disk flow through parsing into records
/// 3. Parsed records flow through biome lookup and criticality scoring
/// 4. The pipeline degrades sanely when the biome dataset is missing
///
/// Run with: cargo test --test pipeline_integration

use chrono::NaiveDate;
use std::path::Path;

use firemon_service::config::MonitorConfig;
use firemon_service::ingest::inpe::FetchKey;
use firemon_service::ingest::loader::{parse_csv, parse_csv_text};
use firemon_service::ingest::slots::{enumerate_day_slots, has_data_rows};
use firemon_service::model::Criticality;
use firemon_service::risk::assessor::{classify_dataset, RiskCriteria};
use firemon_service::risk::biomes::BiomeIndex;

// Representative daily snapshot: one strong Amazônia detection, one
// moderate Cerrado detection, one with nothing notable
const DAILY_CSV: &str = "\
datahora,lat,lon,bioma,frp,estado,municipio,satelite
2024-08-15 12:40:00,-3.1025,-60.0217,Amazônia,84.3,AMAZONAS,MANAUS,AQUA_M-T
2024-08-15 13:10:00,-15.6014,-47.7097,Cerrado,41.0,GOIÁS,FORMOSA,AQUA_M-T
2024-08-15 14:00:00,-7.2100,-39.3100,Caatinga,,CEARÁ,CRATO,NOAA-20
";

// Slot snapshot with alias headers and no biome column
const SLOT_CSV: &str = "\
data_hora_gmt,latitude,longitude,frp,satelite
2024-08-15 12:40:00,-3.1025,-60.0217,120.5,GOES-16
2024-08-15 12:40:00,-9.4501,-40.5123,12.7,GOES-16
";

// Square polygon around Manaus, standing in for the full biome dataset
const BIOMES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "nom_bioma": "Amazônia" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-62, -5], [-58, -5], [-58, -1], [-62, -1], [-62, -5]]]
      }
    }
  ]
}"#;

#[test]
fn test_archive_keys_are_deterministic_and_pure() {
    let config = MonitorConfig::default();
    let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();

    let daily = FetchKey::daily(date);
    assert_eq!(daily.file_name(), "focos_diario_br_20240815.csv");
    assert_eq!(daily.remote_url(&config), daily.remote_url(&config));

    let slots = enumerate_day_slots(date);
    assert_eq!(slots.len(), 144);
    assert_eq!(slots, enumerate_day_slots(date));
    assert_eq!(slots[76].file_name(), "focos_10min_20240815_1240.csv");
}

#[test]
fn test_snapshot_file_to_classified_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focos_diario_br_20240815.csv");
    std::fs::write(&path, DAILY_CSV).unwrap();
    assert!(has_data_rows(&path));

    let mut records = parse_csv(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].biome.as_deref(), Some("Amazônia"));
    assert_eq!(records[0].state.as_deref(), Some("AMAZONAS"));

    let config = MonitorConfig::default();
    let index = BiomeIndex::from_geojson(BIOMES_GEOJSON, "nom_bioma").unwrap();
    classify_dataset(&mut records, &index, &RiskCriteria::from(&config));

    // 84.3 MW in Amazônia: High from FRP, escalated to Critical
    let first = records[0].assessment.as_ref().unwrap();
    assert_eq!(first.tier, Criticality::Critical);

    // 41.0 MW in Cerrado: Medium from both moderate FRP and sensitivity
    let second = records[1].assessment.as_ref().unwrap();
    assert_eq!(second.tier, Criticality::Medium);

    // No FRP, Caatinga is not sensitive
    let third = records[2].assessment.as_ref().unwrap();
    assert_eq!(third.tier, Criticality::Low);
    assert!(!third.reasons.is_empty());
}

#[test]
fn test_slot_snapshot_uses_geolocation_for_missing_biome() {
    let mut records = parse_csv_text(SLOT_CSV).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].biome, None);

    let config = MonitorConfig::default();
    let index = BiomeIndex::from_geojson(BIOMES_GEOJSON, "nom_bioma").unwrap();
    classify_dataset(&mut records, &index, &RiskCriteria::from(&config));

    // Inside the Amazônia square with 120.5 MW
    assert_eq!(records[0].geo_biome.as_deref(), Some("Amazônia"));
    assert_eq!(
        records[0].assessment.as_ref().unwrap().tier,
        Criticality::Critical
    );

    // Outside every polygon, FRP well under half the threshold
    assert_eq!(records[1].geo_biome, None);
    assert_eq!(
        records[1].assessment.as_ref().unwrap().tier,
        Criticality::Low
    );
}

#[test]
fn test_missing_biome_dataset_degrades_to_frp_only() {
    let index = BiomeIndex::load(Path::new("/nonexistent/biomas.json"), "nom_bioma");
    assert!(index.is_empty());

    let mut records = parse_csv_text(SLOT_CSV).unwrap();
    let config = MonitorConfig::default();
    classify_dataset(&mut records, &index, &RiskCriteria::from(&config));

    // FRP alone still raises the tier; no Critical without a biome
    assert_eq!(records[0].geo_biome, None);
    assert_eq!(
        records[0].assessment.as_ref().unwrap().tier,
        Criticality::High
    );
}

#[test]
fn test_empty_and_header_only_snapshots_carry_no_data() {
    let dir = tempfile::tempdir().unwrap();

    let empty = dir.path().join("focos_10min_20240815_0300.csv");
    std::fs::write(&empty, "").unwrap();
    assert!(!has_data_rows(&empty));

    let header_only = dir.path().join("focos_10min_20240815_0310.csv");
    std::fs::write(&header_only, "datahora,lat,lon,bioma,frp\n").unwrap();
    assert!(!has_data_rows(&header_only));
}
