/// Pipeline configuration loader - parses monitor.toml
///
/// Separates archive URLs, thresholds, and the biome dataset location from
/// code, making it easy to retarget the pipeline or tune risk criteria
/// without recompiling the service.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline configuration loaded from monitor.toml.
///
/// Every field has a default matching the INPE queimadas archive layout,
/// so a partial (or absent) configuration file still yields a working
/// pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base URL for daily Brazil-wide fire-spot CSV files.
    pub daily_base_url: String,
    /// Base URL for 10-minute fire-spot CSV files.
    pub ten_min_base_url: String,
    /// Local directory for downloaded raw snapshots.
    pub raw_data_dir: PathBuf,

    /// Per-request timeout in seconds. One stalled download must not stall
    /// the rest of a batch for longer than this.
    pub fetch_timeout_secs: u64,
    /// Concurrency cap for fan-out fetches (slots and date ranges).
    pub fetch_concurrency: usize,

    /// FRP (MW) at or above which a detection is considered high risk.
    pub frp_threshold_mw: f64,
    /// Biomes whose presence raises the risk tier.
    pub sensitive_biomes: Vec<String>,
    /// Subset of sensitive biomes that escalate an already-High detection
    /// to Critical.
    pub critical_biomes: Vec<String>,

    /// Path to the biome polygon dataset (GeoJSON FeatureCollection).
    pub biomes_file: PathBuf,
    /// Feature property holding the biome name in that dataset.
    pub biome_name_property: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            daily_base_url:
                "https://dataserver-coids.inpe.br/queimadas/queimadas/focos/csv/diario/Brasil/"
                    .to_string(),
            ten_min_base_url:
                "https://dataserver-coids.inpe.br/queimadas/queimadas/focos/csv/10min/"
                    .to_string(),
            raw_data_dir: PathBuf::from("output_data/raw"),
            fetch_timeout_secs: 60,
            fetch_concurrency: 32,
            frp_threshold_mw: 75.0,
            sensitive_biomes: vec![
                "Amazônia".to_string(),
                "Mata Atlântica".to_string(),
                "Cerrado".to_string(),
                "Pantanal".to_string(),
            ],
            critical_biomes: vec!["Amazônia".to_string(), "Pantanal".to_string()],
            biomes_file: PathBuf::from("geodata/biomas_5000.json"),
            biome_name_property: "nom_bioma".to_string(),
        }
    }
}

/// Loads configuration from `monitor.toml` in the working directory.
///
/// A missing file is not an error: the built-in defaults target the public
/// INPE archive and are reported as such. A file that exists but cannot be
/// parsed is an error, since silently ignoring an operator's configuration
/// would be worse than refusing to start.
pub fn load_config() -> Result<MonitorConfig, Box<dyn Error>> {
    let config_path = "monitor.toml";

    match fs::read_to_string(config_path) {
        Ok(contents) => {
            let config: MonitorConfig = toml::from_str(&contents)
                .map_err(|e| format!("failed to parse {}: {}", config_path, e))?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("   {} not found, using built-in INPE defaults", config_path);
            Ok(MonitorConfig::default())
        }
        Err(e) => Err(format!("failed to read {}: {}", config_path, e).into()),
    }
}

/// Loads configuration from an explicit path. Unlike `load_config`, a
/// missing file here is an error - the caller asked for that file.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, Box<dyn Error>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let config: MonitorConfig = toml::from_str(&contents)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(config)
}
