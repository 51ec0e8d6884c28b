// ===== chromaforge/src/relation/fixed_target.rs =====
use crate::color::space::conspicuity;
use crate::color::Vision;
use crate::config::Parameters;
use crate::consts::SQUASH_K_FIXED;
use crate::palette::{Candidates, Scheme};
use crate::relation::{squash, PreservationScale, RelationFactory, Side};
use crate::solver::{Constraint, Relation};
use std::rc::Rc;
use tracing::debug;

/// Scores each edge against independent per-vision target differences.
/// The raw separation scale is normalized by the worst shortfall the
/// input scheme exhibits (`max_diff`), so a scheme already meeting
/// every target scores 1 everywhere.
pub struct FixedTargetFactory {
    targets: [Option<f64>; Vision::COUNT],
    max_diff: f64,
    scales: Vec<PreservationScale>,
    edges: Vec<Edge>,
}

struct Edge {
    scope: (usize, usize),
    left: Rc<Candidates>,
    right: Rc<Candidates>,
    skip: Option<Side>,
}

impl FixedTargetFactory {
    pub fn new(scheme: &Scheme, params: &Parameters) -> Self {
        let targets =
            Vision::ALL.map(|v| params.targets.enabled(v).then(|| params.targets.target(v)));

        // Worst shortfall of the current scheme against the targets.
        let max_diff = Vision::ALL
            .iter()
            .zip(&targets)
            .filter_map(|(&v, t)| t.map(|t| t - scheme.lowest_difference(v)))
            .fold(0.0f64, f64::max);

        // Conspicuous slots get proportionally tighter tolerances.
        let base = PreservationScale::against_maxima(&params.tolerances);
        let salience: Vec<f64> = scheme
            .values()
            .iter()
            .map(|v| conspicuity(v.lab(Vision::Trichromacy)))
            .collect();
        let peak = salience.iter().copied().fold(0.0f64, f64::max);
        let rate = params.tolerances.conspicuity_rate;
        let scales = salience
            .iter()
            .map(|&s| {
                let normalized = if peak > 0.0 { s / peak } else { 0.0 };
                base.shrunk((1.0 - rate * normalized).clamp(0.0, 1.0))
            })
            .collect();

        debug!(max_diff, "fixed-target factory built");
        Self {
            targets,
            max_diff,
            scales,
            edges: Vec::new(),
        }
    }
}

impl RelationFactory for FixedTargetFactory {
    fn add_edge(
        &mut self,
        i: usize,
        j: usize,
        left: Rc<Candidates>,
        right: Rc<Candidates>,
        skip: Option<Side>,
    ) {
        self.edges.push(Edge {
            scope: (i, j),
            left,
            right,
            skip,
        });
    }

    fn seal(self: Box<Self>) -> Vec<Constraint> {
        let Self {
            targets,
            max_diff,
            scales,
            edges,
        } = *self;
        edges
            .into_iter()
            .map(|e| {
                let (i, j) = e.scope;
                let relation = FixedTargetRelation {
                    left: e.left,
                    right: e.right,
                    targets,
                    max_diff,
                    left_scale: (e.skip != Some(Side::Left)).then(|| scales[i].clone()),
                    right_scale: (e.skip != Some(Side::Right)).then(|| scales[j].clone()),
                };
                Constraint {
                    scope: e.scope,
                    relation: Rc::new(relation),
                }
            })
            .collect()
    }
}

struct FixedTargetRelation {
    left: Rc<Candidates>,
    right: Rc<Candidates>,
    targets: [Option<f64>; Vision::COUNT],
    max_diff: f64,
    left_scale: Option<PreservationScale>,
    right_scale: Option<PreservationScale>,
}

impl Relation for FixedTargetRelation {
    fn degree(&self, a: usize, b: usize) -> f64 {
        let va = self.left.value(a);
        let vb = self.right.value(b);

        // Separation: worst enabled vision against its target.
        let mut raw = f64::INFINITY;
        for vision in Vision::ALL {
            if let Some(target) = self.targets[vision.index()] {
                let scale = if self.max_diff <= f64::EPSILON {
                    1.0
                } else {
                    1.0 - (target - va.difference(vb, vision)) / self.max_diff
                };
                raw = raw.min(scale);
            }
        }
        let mut degree = if raw.is_finite() {
            squash(raw, SQUASH_K_FIXED)
        } else {
            1.0
        };

        // Preservation per endpoint. Candidate 0 is the unmodified
        // color, which preserves trivially.
        if a != 0 {
            if let (Some(scale), Some(original)) = (&self.left_scale, self.left.original()) {
                if let Some(raw) = scale.raw(original, va) {
                    degree = degree.min(squash(raw, SQUASH_K_FIXED));
                }
            }
        }
        if b != 0 {
            if let (Some(scale), Some(original)) = (&self.right_scale, self.right.original()) {
                if let Some(raw) = scale.raw(original, vb) {
                    degree = degree.min(squash(raw, SQUASH_K_FIXED));
                }
            }
        }
        degree
    }
}
