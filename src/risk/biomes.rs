/// Biome polygon index: GeoJSON load + point-in-polygon lookups.
///
/// The index is built once at startup and passed by reference into the
/// classifier; after load it is immutable, so concurrent lookups need no
/// locking. Loading fails softly: a missing or malformed dataset yields an
/// empty index and every lookup then returns "unknown" - risk scoring
/// degrades to FRP-only instead of the process aborting.

use geo::{Contains, MultiPolygon, Point};
use geojson::GeoJson;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One named biome boundary, kept in dataset feature order.
#[derive(Debug, Clone)]
pub struct BiomePolygon {
    pub name: String,
    boundary: MultiPolygon<f64>,
}

/// Immutable set of biome boundaries for point lookups.
#[derive(Debug, Clone, Default)]
pub struct BiomeIndex {
    polygons: Vec<BiomePolygon>,
}

impl BiomeIndex {
    /// An index with no polygons; every lookup returns `None`.
    pub fn empty() -> BiomeIndex {
        BiomeIndex::default()
    }

    /// Loads the biome dataset, reporting any problem to stderr and
    /// falling back to an empty index. Callers treat "biome lookup
    /// unavailable" as a normal condition, so there is no error path here.
    pub fn load(path: &Path, name_property: &str) -> BiomeIndex {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!(
                    "⚠ biome dataset {} unavailable: {} (biome lookups disabled)",
                    path.display(),
                    e
                );
                return BiomeIndex::empty();
            }
        };

        match BiomeIndex::from_geojson(&text, name_property) {
            Ok(index) => {
                println!(
                    "✓ Loaded {} biome polygons from {}",
                    index.len(),
                    path.display()
                );
                index
            }
            Err(cause) => {
                eprintln!(
                    "⚠ biome dataset {} rejected: {} (biome lookups disabled)",
                    path.display(),
                    cause
                );
                BiomeIndex::empty()
            }
        }
    }

    /// Parses a GeoJSON FeatureCollection into an index. Strict: every
    /// feature must carry the name property and an areal geometry, so a
    /// half-usable dataset is rejected as a whole (and `load` degrades to
    /// empty) rather than silently dropping biomes.
    pub fn from_geojson(text: &str, name_property: &str) -> Result<BiomeIndex, String> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| format!("invalid GeoJSON: {}", e))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => return Err("expected a FeatureCollection".to_string()),
        };

        let mut polygons = Vec::new();
        for feature in collection.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(name_property))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| format!("feature missing '{}' property", name_property))?;

            let geometry = feature
                .geometry
                .ok_or_else(|| format!("feature '{}' has no geometry", name))?;
            let geometry: geo::Geometry<f64> = geometry
                .try_into()
                .map_err(|e| format!("feature '{}': unsupported geometry: {}", name, e))?;

            let boundary = match geometry {
                geo::Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
                geo::Geometry::MultiPolygon(multi) => multi,
                _ => {
                    return Err(format!("feature '{}' is not a polygon geometry", name));
                }
            };

            polygons.push(BiomePolygon { name, boundary });
        }

        Ok(BiomeIndex { polygons })
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Name of the biome containing the point, or `None` when either
    /// coordinate is absent, the index is empty, or no polygon contains
    /// the point.
    ///
    /// When polygons overlap (shared borders between neighboring biomes),
    /// the first containing polygon in dataset load order wins. That is a
    /// determinism guarantee, not a spatial-correctness claim.
    pub fn lookup(&self, latitude: Option<f64>, longitude: Option<f64>) -> Option<&str> {
        let (lat, lon) = (latitude?, longitude?);
        let point = Point::new(lon, lat);
        self.polygons
            .iter()
            .find(|biome| biome.boundary.contains(&point))
            .map(|biome| biome.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
