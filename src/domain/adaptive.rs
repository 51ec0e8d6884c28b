// ===== chromaforge/src/domain/adaptive.rs =====
use crate::color::Vision;
use crate::config::Parameters;
use crate::domain::{self, CandidateFilter, DomainFactory};
use crate::palette::{Candidates, Scheme};
use crate::partition::CellMap;
use tracing::debug;

/// Candidate domains with a per-slot perceptual cap: each slot may
/// drift up to the largest trichromatic difference between its current
/// color and any of its current neighbors, so tightly packed regions
/// move little and isolated colors move freely. Slots with no
/// neighbors fall back to the global `max_delta_e`. The omitted slot
/// receives its own full cell, unfiltered.
pub struct AdaptiveDomainFactory<'a> {
    scheme: &'a Scheme,
    params: &'a Parameters,
}

impl<'a> AdaptiveDomainFactory<'a> {
    pub fn new(scheme: &'a Scheme, params: &'a Parameters) -> Self {
        Self { scheme, params }
    }
}

impl DomainFactory for AdaptiveDomainFactory<'_> {
    fn build(&self, omit: Option<usize>) -> Vec<Candidates> {
        let n = self.scheme.size();
        let sites: Vec<[f64; 3]> = self
            .scheme
            .values()
            .iter()
            .map(|v| v.lab(Vision::Trichromacy))
            .collect();
        // Caps follow the omit-filtered table; cells keep the full
        // neighborhood so the other slots' sample sets stay put when
        // a slot is omitted.
        let table = self.scheme.adjacency_table(omit);
        let cells = CellMap::new(sites.clone(), self.scheme.adjacency_table(None));
        let resolution = self.params.search.sample_resolution;

        let mut domains = Vec::with_capacity(n);
        for i in 0..n {
            let current = self.scheme.value(i);
            let built = if omit == Some(i) {
                // The freed slot's own cell, unconstrained by any
                // neighbor.
                let freed = CellMap::new(sites.clone(), table.clone());
                domain::full_domain(current, domain::gamut_samples(&freed, i, resolution))
            } else if self.scheme.is_fixed(i) {
                Candidates::singleton(current.clone())
            } else {
                let cap = table[i]
                    .iter()
                    .map(|&j| self.scheme.difference(i, j, Vision::Trichromacy))
                    .fold(f64::NAN, f64::max);
                let cap = if cap.is_nan() {
                    self.params.tolerances.max_delta_e
                } else {
                    cap
                };
                let filter = CandidateFilter::new(&self.params.tolerances, cap);
                let samples = domain::gamut_samples(&cells, i, resolution);
                domain::regular_domain(current, samples, &filter)
            };
            debug!(slot = i, candidates = built.len(), "adaptive domain built");
            domains.push(built);
        }
        domains
    }
}
