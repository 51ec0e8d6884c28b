// ===== chromaforge/src/domain/uniform.rs =====
use crate::color::Vision;
use crate::config::Parameters;
use crate::domain::{self, CandidateFilter, DomainFactory};
use crate::palette::{Candidates, Scheme};
use crate::partition::CellMap;
use tracing::debug;

/// Candidate domains under a single global perceptual cap. Every
/// non-fixed slot samples its own partition cell and keeps the
/// candidates within `max_delta_e` of its current color; the omitted
/// slot instead receives the largest sample set found across all
/// slots, unfiltered.
pub struct UniformDomainFactory<'a> {
    scheme: &'a Scheme,
    params: &'a Parameters,
}

impl<'a> UniformDomainFactory<'a> {
    pub fn new(scheme: &'a Scheme, params: &'a Parameters) -> Self {
        Self { scheme, params }
    }
}

impl DomainFactory for UniformDomainFactory<'_> {
    fn build(&self, omit: Option<usize>) -> Vec<Candidates> {
        let n = self.scheme.size();
        let sites = self
            .scheme
            .values()
            .iter()
            .map(|v| v.lab(Vision::Trichromacy))
            .collect();
        // Cells always use the full neighborhood: omitting a slot
        // must not leak its grid points into the other domains.
        let cells = CellMap::new(sites, self.scheme.adjacency_table(None));
        let resolution = self.params.search.sample_resolution;
        let filter =
            CandidateFilter::new(&self.params.tolerances, self.params.tolerances.max_delta_e);

        let samples: Vec<_> = (0..n)
            .map(|i| domain::gamut_samples(&cells, i, resolution))
            .collect();

        let mut domains = Vec::with_capacity(n);
        for i in 0..n {
            let current = self.scheme.value(i);
            let built = if omit == Some(i) {
                let widest = samples
                    .iter()
                    .max_by_key(|s| s.len())
                    .cloned()
                    .unwrap_or_default();
                domain::full_domain(current, widest)
            } else if self.scheme.is_fixed(i) {
                Candidates::singleton(current.clone())
            } else {
                domain::regular_domain(current, samples[i].clone(), &filter)
            };
            debug!(slot = i, candidates = built.len(), "uniform domain built");
            domains.push(built);
        }
        domains
    }
}
