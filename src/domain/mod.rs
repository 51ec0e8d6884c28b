// ===== chromaforge/src/domain/mod.rs =====
pub mod adaptive;
pub mod uniform;

pub use self::adaptive::AdaptiveDomainFactory;
pub use self::uniform::UniformDomainFactory;

use crate::color::Vision;
use crate::config::ToleranceParams;
use crate::palette::{Candidates, Value};
use crate::partition::CellMap;

/// Builds one candidate domain per slot. `omit = Some(k)` hands slot
/// k a full unrestricted domain (strategy-specific) instead of its
/// filtered neighborhood, for the two-phase bottleneck solve.
pub trait DomainFactory {
    fn build(&self, omit: Option<usize>) -> Vec<Candidates>;
}

/// The is-candidate filter shared by both factories: a perceptual
/// cap around the current color plus optional hue/tone ceilings.
pub(crate) struct CandidateFilter {
    pub max_delta_e: f64,
    pub hue_ceiling: Option<f64>,
    pub tone_ceiling: Option<f64>,
}

impl CandidateFilter {
    pub fn new(tolerances: &ToleranceParams, max_delta_e: f64) -> Self {
        Self {
            max_delta_e,
            hue_ceiling: tolerances.preserve_hue.then(|| tolerances.hue_ceiling()),
            tone_ceiling: tolerances.preserve_tone.then(|| tolerances.tone_ceiling()),
        }
    }

    pub fn accept(&self, current: &Value, candidate: &Value) -> bool {
        if current.difference(candidate, Vision::Trichromacy) > self.max_delta_e {
            return false;
        }
        if let Some(ceiling) = self.hue_ceiling {
            if current.delta_hue(candidate) > ceiling {
                return false;
            }
        }
        if let Some(ceiling) = self.tone_ceiling {
            if current.delta_tone(candidate) > ceiling {
                return false;
            }
        }
        true
    }
}

/// Gamut-valid values sampled from one slot's partition cell.
pub(crate) fn gamut_samples(cells: &CellMap, slot: usize, resolution: usize) -> Vec<Value> {
    cells
        .samples(slot, resolution)
        .into_iter()
        .filter_map(Value::from_lab)
        .collect()
}

/// A regular (non-omitted, non-fixed) slot's domain: the unmodified
/// current color at index 0, then every sample passing the filter.
pub(crate) fn regular_domain(
    current: &Value,
    samples: Vec<Value>,
    filter: &CandidateFilter,
) -> Candidates {
    let mut domain = Candidates::singleton(current.clone());
    domain
        .list
        .extend(samples.into_iter().filter(|v| filter.accept(current, v)));
    domain
}

/// The omitted slot's domain: the full sample set with the slot's
/// current color as the designated original, falling back to the
/// singleton current color when the set is empty.
pub(crate) fn full_domain(current: &Value, samples: Vec<Value>) -> Candidates {
    if samples.is_empty() {
        return Candidates::singleton(current.clone());
    }
    let mut domain = Candidates::new();
    domain.list = samples;
    domain.set_original(current.clone());
    domain
}
