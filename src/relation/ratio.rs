// ===== chromaforge/src/relation/ratio.rs =====
use crate::color::Vision;
use crate::config::Parameters;
use crate::consts::SQUASH_K_RATIO;
use crate::palette::{Candidates, Scheme};
use crate::relation::{squash, PreservationScale, RelationFactory, Side};
use crate::solver::{Constraint, Relation};
use std::rc::Rc;
use tracing::debug;

/// How the per-vision raw scales of one edge combine into its degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioAggregation {
    Average,
    Minimum,
}

/// Derives per-vision targets from the trichromatic separation via a
/// discovered ratio: while edges are added, the factory scans each
/// side's fully-preserved candidates for the best achievable
/// separation per vision and folds `best / trichromatic` into a
/// running minimum. `seal` then fixes the ratios (shared across
/// visions for `Average`) and the normalization span.
pub struct RatioFactory {
    aggregation: RatioAggregation,
    enabled: [bool; Vision::COUNT],
    scale: PreservationScale,
    ratios: [f64; Vision::COUNT],
    /// Scheme-edge data for the seal-time span: per-vision differences
    /// and the both-endpoints-fixed flag. Edges touching the omitted
    /// bottleneck are dropped at construction.
    spans: Vec<([f64; Vision::COUNT], bool)>,
    edges: Vec<Edge>,
}

struct Edge {
    scope: (usize, usize),
    left: Rc<Candidates>,
    right: Rc<Candidates>,
    skip: Option<Side>,
}

impl RatioFactory {
    pub fn new(
        scheme: &Scheme,
        params: &Parameters,
        aggregation: RatioAggregation,
        omit: Option<usize>,
    ) -> Self {
        let spans = scheme
            .adjacencies()
            .iter()
            .filter(|&&(i, j)| omit != Some(i) && omit != Some(j))
            .map(|&(i, j)| {
                let diffs = Vision::ALL.map(|v| scheme.difference(i, j, v));
                (diffs, scheme.is_fixed(i) && scheme.is_fixed(j))
            })
            .collect();
        Self {
            aggregation,
            enabled: params.targets.enabled_flags(),
            scale: PreservationScale::against_ceilings(&params.tolerances),
            ratios: [1.0; Vision::COUNT],
            spans,
            edges: Vec::new(),
        }
    }

    /// Running upper bound on the separation ratio for one vision.
    /// Starts at 1 and only decreases as edges are added.
    pub fn ratio_bound(&self, vision: Vision) -> f64 {
        self.ratios[vision.index()]
    }

    fn discover(&mut self, left: &Candidates, right: &Candidates) {
        let (original_l, original_r) = match (left.original(), right.original()) {
            (Some(l), Some(r)) => (l, r),
            _ => return,
        };
        let base = original_l.difference(original_r, Vision::Trichromacy);
        if base <= f64::EPSILON {
            return;
        }
        let preserved_l: Vec<_> = left
            .list
            .iter()
            .filter(|c| self.scale.fully_preserved(original_l, c))
            .collect();
        let preserved_r: Vec<_> = right
            .list
            .iter()
            .filter(|c| self.scale.fully_preserved(original_r, c))
            .collect();
        if preserved_l.is_empty() || preserved_r.is_empty() {
            return;
        }

        for vision in Vision::ALL {
            if vision == Vision::Trichromacy || !self.enabled[vision.index()] {
                continue;
            }
            let mut best = 0.0f64;
            for l in &preserved_l {
                for r in &preserved_r {
                    best = best.max(l.difference(r, vision));
                }
            }
            let slot = &mut self.ratios[vision.index()];
            *slot = slot.min(best / base);
        }
    }
}

impl RelationFactory for RatioFactory {
    fn add_edge(
        &mut self,
        i: usize,
        j: usize,
        left: Rc<Candidates>,
        right: Rc<Candidates>,
        skip: Option<Side>,
    ) {
        self.discover(&left, &right);
        self.edges.push(Edge {
            scope: (i, j),
            left,
            right,
            skip,
        });
    }

    fn seal(self: Box<Self>) -> Vec<Constraint> {
        let Self {
            aggregation,
            enabled,
            scale,
            mut ratios,
            spans,
            edges,
        } = *self;

        ratios[Vision::Trichromacy.index()] = 1.0;
        if aggregation == RatioAggregation::Average {
            // One shared ratio: the tightest deficient vision wins.
            let shared = Vision::ALL
                .iter()
                .filter(|&&v| v != Vision::Trichromacy && enabled[v.index()])
                .map(|v| ratios[v.index()])
                .fold(1.0f64, f64::min);
            for vision in Vision::ALL {
                if vision != Vision::Trichromacy {
                    ratios[vision.index()] = shared;
                }
            }
        }

        // Normalization span: worst gap between what an edge shows
        // under a vision and what the ratio predicts from its
        // trichromatic separation.
        let mut max_diff = 0.0f64;
        for (diffs, both_fixed) in &spans {
            if *both_fixed {
                continue;
            }
            let base = diffs[Vision::Trichromacy.index()];
            for vision in Vision::ALL {
                if enabled[vision.index()] {
                    max_diff =
                        max_diff.max((diffs[vision.index()] - base * ratios[vision.index()]).abs());
                }
            }
        }
        debug!(?ratios, max_diff, "ratio factory sealed");

        edges
            .into_iter()
            .map(|e| {
                let base = match (e.left.original(), e.right.original()) {
                    (Some(l), Some(r)) => l.difference(r, Vision::Trichromacy),
                    _ => 0.0,
                };
                let relation = RatioRelation {
                    left: e.left,
                    right: e.right,
                    aggregation,
                    enabled,
                    ratios,
                    base,
                    max_diff,
                    left_scale: (e.skip != Some(Side::Left)).then(|| scale.clone()),
                    right_scale: (e.skip != Some(Side::Right)).then(|| scale.clone()),
                };
                Constraint {
                    scope: e.scope,
                    relation: Rc::new(relation),
                }
            })
            .collect()
    }
}

struct RatioRelation {
    left: Rc<Candidates>,
    right: Rc<Candidates>,
    aggregation: RatioAggregation,
    enabled: [bool; Vision::COUNT],
    ratios: [f64; Vision::COUNT],
    /// Trichromatic separation of the edge's original colors.
    base: f64,
    max_diff: f64,
    left_scale: Option<PreservationScale>,
    right_scale: Option<PreservationScale>,
}

impl Relation for RatioRelation {
    fn degree(&self, a: usize, b: usize) -> f64 {
        let va = self.left.value(a);
        let vb = self.right.value(b);

        // Separation against the ratio-derived targets.
        let mut sum = 0.0f64;
        let mut min = f64::INFINITY;
        let mut count = 0usize;
        for vision in Vision::ALL {
            if !self.enabled[vision.index()] {
                continue;
            }
            let target = self.base * self.ratios[vision.index()];
            let raw = if self.max_diff <= f64::EPSILON {
                1.0
            } else {
                1.0 - (target - va.difference(vb, vision)) / self.max_diff
            };
            sum += raw;
            min = min.min(raw);
            count += 1;
        }
        let raw = if count == 0 {
            1.0
        } else {
            match self.aggregation {
                RatioAggregation::Average => sum / count as f64,
                RatioAggregation::Minimum => min,
            }
        };
        let mut degree = squash(raw, SQUASH_K_RATIO);

        // Preservation: candidates identical to their original are
        // exempt outright.
        if let (Some(scale), Some(original)) = (&self.left_scale, self.left.original()) {
            if original.rgb() != va.rgb() {
                if let Some(raw) = scale.raw(original, va) {
                    degree = degree.min(squash(raw, SQUASH_K_RATIO));
                }
            }
        }
        if let (Some(scale), Some(original)) = (&self.right_scale, self.right.original()) {
            if original.rgb() != vb.rgb() {
                if let Some(raw) = scale.raw(original, vb) {
                    degree = degree.min(squash(raw, SQUASH_K_RATIO));
                }
            }
        }
        degree
    }
}
