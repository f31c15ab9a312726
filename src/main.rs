//! Wildfire Detection Monitoring Service - CLI Entry Point
//!
//! Collects satellite fire detections from the INPE queimadas archive,
//! classifies each detection's criticality, and prints an alert summary:
//! 1. Fetches daily or 10-minute snapshots concurrently
//! 2. Parses CSV rows into detection records
//! 3. Geolocates records against biome polygons where needed
//! 4. Scores every record into Low/Medium/High/Critical
//!
//! Usage:
//!   cargo run --release -- daily                                # Last 7 days
//!   cargo run --release -- daily --start 2024-08-01 --end 2024-08-07
//!   cargo run --release -- slots                                # Yesterday, all 144 slots
//!   cargo run --release -- slots --date 2024-08-15
//!
//! Configuration is read from monitor.toml in the working directory;
//! built-in defaults apply when the file is absent.

use chrono::{Duration, NaiveDate, Utc};
use std::env;

use firemon_service::config::{self, MonitorConfig};
use firemon_service::ingest::{inpe, range, slots};
use firemon_service::model::{Criticality, DetectionRecord};
use firemon_service::risk::assessor::{self, RiskCriteria};
use firemon_service::risk::biomes::BiomeIndex;

fn main() {
    println!("🔥 Wildfire Detection Monitoring Service");
    println!("=========================================\n");

    let args: Vec<String> = env::args().collect();
    let command = match args.get(1).map(String::as_str) {
        Some("daily") | None => Command::daily_from_args(&args),
        Some("slots") => Command::slots_from_args(&args),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            usage_and_exit(&args[0]);
        }
    };

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match inpe::http_client(config.fetch_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // Biome index loads once; a missing dataset degrades lookups, not the run
    let index = BiomeIndex::load(&config.biomes_file, &config.biome_name_property);
    let criteria = RiskCriteria::from(&config);

    let mut records = match command {
        Command::Daily { start, end } => {
            println!(
                "📊 Collecting daily snapshots {} → {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            );
            match range::fetch_range(&client, &config, start, end) {
                Ok(report) => {
                    for warning in &report.warnings {
                        eprintln!("   ⚠ {}", warning);
                    }
                    println!(
                        "   {} day(s) with data, {} without\n",
                        report.days_with_data, report.days_missing
                    );
                    report.records
                }
                Err(e) => {
                    eprintln!("\n❌ Collection failed: {}\n", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Slots { date } => {
            println!("📊 Collecting 10-minute snapshots for {}", date.format("%Y-%m-%d"));
            slots::load_day_slots(&client, &config, date)
        }
    };

    if records.is_empty() {
        println!("No fire detections registered for the requested period.");
        return;
    }

    assessor::classify_dataset(&mut records, &index, &criteria);
    print_summary(&records, &config);
}

enum Command {
    Daily { start: NaiveDate, end: NaiveDate },
    Slots { date: NaiveDate },
}

impl Command {
    /// `daily [--start YYYY-MM-DD] [--end YYYY-MM-DD]`, defaulting to the
    /// seven days ending yesterday (today's snapshot is still accumulating).
    fn daily_from_args(args: &[String]) -> Command {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let mut start = yesterday - Duration::days(7);
        let mut end = yesterday;

        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--start" => start = parse_date_arg(args, i),
                "--end" => end = parse_date_arg(args, i),
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    usage_and_exit(&args[0]);
                }
            }
            i += 2;
        }

        if start > end {
            eprintln!(
                "Error: start {} is after end {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            );
            std::process::exit(1);
        }

        Command::Daily { start, end }
    }

    /// `slots [--date YYYY-MM-DD]`, defaulting to yesterday.
    fn slots_from_args(args: &[String]) -> Command {
        let mut date = Utc::now().date_naive() - Duration::days(1);

        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--date" => date = parse_date_arg(args, i),
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    usage_and_exit(&args[0]);
                }
            }
            i += 2;
        }

        Command::Slots { date }
    }
}

fn parse_date_arg(args: &[String], flag_idx: usize) -> NaiveDate {
    let Some(value) = args.get(flag_idx + 1) else {
        eprintln!("Error: {} requires a YYYY-MM-DD date", args[flag_idx]);
        std::process::exit(1);
    };
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            eprintln!("Error: invalid date '{}' (expected YYYY-MM-DD)", value);
            std::process::exit(1);
        }
    }
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!("Usage: {} daily [--start YYYY-MM-DD] [--end YYYY-MM-DD]", program);
    eprintln!("       {} slots [--date YYYY-MM-DD]", program);
    std::process::exit(1);
}

/// Prints per-tier counts and a detail line for every High or Critical
/// detection.
fn print_summary(records: &[DetectionRecord], config: &MonitorConfig) {
    println!("📊 Assessment summary ({} detections)", records.len());
    for tier in Criticality::ALL {
        let count = records
            .iter()
            .filter(|r| r.assessment.as_ref().is_some_and(|a| a.tier == tier))
            .count();
        println!("   {:<10} {}", tier.as_str(), count);
    }

    let alerts: Vec<&DetectionRecord> = records
        .iter()
        .filter(|r| {
            r.assessment
                .as_ref()
                .is_some_and(|a| a.tier >= Criticality::High)
        })
        .collect();

    if alerts.is_empty() {
        println!("\n✓ No detections above the alert threshold ({} MW FRP)", config.frp_threshold_mw);
        return;
    }

    println!("\n🔥 {} detection(s) at High or Critical:", alerts.len());
    for record in alerts {
        let Some(assessment) = &record.assessment else {
            continue;
        };
        let when = record
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        let coords = match (record.latitude, record.longitude) {
            (Some(lat), Some(lon)) => format!("({:.4}, {:.4})", lat, lon),
            _ => "(no coordinates)".to_string(),
        };
        let biome = record
            .biome
            .as_deref()
            .or(record.geo_biome.as_deref())
            .unwrap_or("unknown biome");

        println!(
            "   ✗ {:<8} {} {} in {}",
            assessment.tier.as_str(),
            when,
            coords,
            biome
        );
        for reason in &assessment.reasons {
            println!("       · {}", reason);
        }
    }
}
