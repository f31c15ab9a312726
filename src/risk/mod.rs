/// Risk assessment: biome geolocation plus per-detection criticality
/// scoring. `biomes` owns the polygon index built at startup; `assessor`
/// consumes it to score detections.

pub mod assessor;
pub mod biomes;
