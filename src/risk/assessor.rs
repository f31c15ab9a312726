/// Per-detection criticality scoring.
///
/// `classify` is a pure function over one record plus the (immutable)
/// biome index: every call with the same inputs yields the same tier and
/// the same reason list, in the same order. Scoring works on tier floors -
/// each criterion can only raise the tier, never lower it - so adding
/// criteria preserves monotonicity.
///
/// Criteria, in evaluation order:
/// 1. effective biome: the record's own biome column if present, otherwise
///    a polygon lookup on its coordinates (recorded as a reason when used)
/// 2. fire radiative power: >= threshold raises the floor to High,
///    >= half the threshold raises it to Medium; both record a reason
/// 3. biome sensitivity: a sensitive biome raises the floor to Medium, and
///    escalates to Critical when the tier already reached High and the
///    biome is in the highest-sensitivity subset
///
/// Assessments always carry at least one reason string.

use crate::config::MonitorConfig;
use crate::model::{Criticality, CriticalityAssessment, DetectionRecord};
use crate::risk::biomes::BiomeIndex;

/// Scoring parameters, extracted from configuration once per run.
#[derive(Debug, Clone)]
pub struct RiskCriteria {
    pub frp_threshold_mw: f64,
    pub sensitive_biomes: Vec<String>,
    pub critical_biomes: Vec<String>,
}

impl From<&MonitorConfig> for RiskCriteria {
    fn from(config: &MonitorConfig) -> Self {
        RiskCriteria {
            frp_threshold_mw: config.frp_threshold_mw,
            sensitive_biomes: config.sensitive_biomes.clone(),
            critical_biomes: config.critical_biomes.clone(),
        }
    }
}

/// Assessment plus the biome resolved by geolocation, when the record had
/// no explicit biome and the polygon lookup found one.
#[derive(Debug, Clone)]
pub struct Classified {
    pub assessment: CriticalityAssessment,
    pub geo_biome: Option<String>,
}

/// Scores one detection. Never fails: absent or malformed signals simply
/// contribute nothing to the tier.
pub fn classify(
    record: &DetectionRecord,
    index: &BiomeIndex,
    criteria: &RiskCriteria,
) -> Classified {
    let mut tier = Criticality::Low;
    let mut reasons: Vec<String> = Vec::new();

    // Effective biome: the explicit column wins; otherwise fall back to
    // the polygon lookup (null coordinates make the lookup a no-op)
    let mut geo_biome = None;
    let effective_biome = match &record.biome {
        Some(biome) => Some(biome.clone()),
        None => {
            let found = index
                .lookup(record.latitude, record.longitude)
                .map(str::to_string);
            if let Some(biome) = &found {
                reasons.push(format!("Biome determined by geolocation: {}", biome));
                geo_biome = Some(biome.clone());
            }
            found
        }
    };

    // Criterion 1: fire radiative power
    if let Some(frp) = record.frp {
        if frp >= criteria.frp_threshold_mw {
            reasons.push(format!(
                "Elevated FRP ({:.2} MW >= {} MW)",
                frp, criteria.frp_threshold_mw
            ));
            tier = tier.max(Criticality::High);
        } else if frp >= criteria.frp_threshold_mw / 2.0 {
            reasons.push(format!(
                "Moderate FRP ({:.2} MW >= {} MW)",
                frp,
                criteria.frp_threshold_mw / 2.0
            ));
            tier = tier.max(Criticality::Medium);
        }
    }

    // Criterion 2: biome sensitivity
    if let Some(biome) = &effective_biome {
        if criteria.sensitive_biomes.iter().any(|b| b == biome) {
            // The geolocation reason already names this biome; avoid a
            // duplicate mention
            if geo_biome.is_none() {
                reasons.push(format!("Sensitive biome ({})", biome));
            }

            if tier >= Criticality::High && criteria.critical_biomes.iter().any(|b| b == biome) {
                tier = tier.max(Criticality::Critical);
            } else {
                tier = tier.max(Criticality::Medium);
            }
        }
    }

    if reasons.is_empty() {
        if tier > Criticality::Low {
            reasons.push("Risk criterion met (detail unspecified)".to_string());
        } else {
            reasons.push("No specific risk criterion met".to_string());
        }
    }

    Classified {
        assessment: CriticalityAssessment { tier, reasons },
        geo_biome,
    }
}

/// Applies `classify` to every record, attaching the assessment and the
/// geolocation-derived biome in place. Records are independent, so order
/// of application carries no meaning.
pub fn classify_dataset(
    records: &mut [DetectionRecord],
    index: &BiomeIndex,
    criteria: &RiskCriteria,
) {
    for record in records.iter_mut() {
        let classified = classify(record, index, criteria);
        record.geo_biome = classified.geo_biome;
        record.assessment = Some(classified.assessment);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
