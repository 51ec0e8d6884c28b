// ===== chromaforge/src/relation/mod.rs =====
pub mod fixed_target;
pub mod ratio;

pub use self::fixed_target::FixedTargetFactory;
pub use self::ratio::{RatioAggregation, RatioFactory};

use crate::config::ToleranceParams;
use crate::palette::{Candidates, Value};
use crate::solver::Constraint;
use std::rc::Rc;

/// Which endpoint of an edge is exempt from preservation scoring
/// (the bottleneck slot in bottleneck mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Two-phase constraint builder: edges are accumulated with
/// `add_edge`, then `seal` finalizes any factory-level scalars (ratio
/// bounds, difference spans) and yields one solver constraint per
/// added edge, in add order. Nothing is computed lazily at first
/// evaluation.
pub trait RelationFactory {
    fn add_edge(
        &mut self,
        i: usize,
        j: usize,
        left: Rc<Candidates>,
        right: Rc<Candidates>,
        skip: Option<Side>,
    );

    fn seal(self: Box<Self>) -> Vec<Constraint>;
}

/// Logistic squash mapping a raw scale onto (0, 1), centered at 0.5.
pub(crate) fn squash(s: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-k * (s - 0.5)).exp())
}

/// Per-axis linear preservation scoring: a candidate scores 1 when
/// its drift from the original sits at the tolerance and 0 at the
/// axis ceiling. Axes switched off by the tolerance settings do not
/// constrain.
#[derive(Debug, Clone)]
pub(crate) struct PreservationScale {
    hue: Option<(f64, f64)>,
    tone: Option<(f64, f64)>,
}

impl PreservationScale {
    /// Scales against the absolute perceptual maxima (fixed-target
    /// relation).
    pub fn against_maxima(tolerances: &ToleranceParams) -> Self {
        Self {
            hue: tolerances
                .preserve_hue
                .then_some((tolerances.hue_tolerance, crate::consts::MAX_HUE_TOLERANCE)),
            tone: tolerances
                .preserve_tone
                .then_some((tolerances.tone_tolerance, crate::consts::MAX_TONE_TOLERANCE)),
        }
    }

    /// Scales against the domain-filter ceilings (ratio relations).
    pub fn against_ceilings(tolerances: &ToleranceParams) -> Self {
        Self {
            hue: tolerances
                .preserve_hue
                .then_some((tolerances.hue_tolerance, tolerances.hue_ceiling())),
            tone: tolerances
                .preserve_tone
                .then_some((tolerances.tone_tolerance, tolerances.tone_ceiling())),
        }
    }

    /// The same scale with both tolerances multiplied by `factor`
    /// (conspicuity weighting). Ceilings are unchanged.
    pub fn shrunk(&self, factor: f64) -> Self {
        let shrink = |axis: Option<(f64, f64)>| axis.map(|(tol, max)| (tol * factor, max));
        Self {
            hue: shrink(self.hue),
            tone: shrink(self.tone),
        }
    }

    /// Worst per-axis raw scale for a candidate, `None` when no axis
    /// constrains. May exceed 1 inside the tolerance; the squash caps
    /// it.
    pub fn raw(&self, original: &Value, candidate: &Value) -> Option<f64> {
        let axis = |deviation: f64, (tol, max): (f64, f64)| {
            (max - deviation) / (max - tol).max(1e-6)
        };
        let hue = self
            .hue
            .map(|a| axis(original.delta_hue(candidate), a));
        let tone = self
            .tone
            .map(|a| axis(original.delta_tone(candidate), a));
        match (hue, tone) {
            (Some(h), Some(t)) => Some(h.min(t)),
            (Some(h), None) => Some(h),
            (None, Some(t)) => Some(t),
            (None, None) => None,
        }
    }

    /// True when the candidate sits within tolerance on every
    /// constrained axis (identical colors trivially qualify).
    pub fn fully_preserved(&self, original: &Value, candidate: &Value) -> bool {
        if original.rgb() == candidate.rgb() {
            return true;
        }
        let hue_ok = self
            .hue
            .map(|(tol, _)| original.delta_hue(candidate) <= tol)
            .unwrap_or(true);
        let tone_ok = self
            .tone
            .map(|(tol, _)| original.delta_tone(candidate) <= tol)
            .unwrap_or(true);
        hue_ok && tone_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SQUASH_K_FIXED, SQUASH_K_RATIO};

    #[test]
    fn squash_is_centered_and_bounded() {
        for k in [SQUASH_K_FIXED, SQUASH_K_RATIO] {
            assert!((squash(0.5, k) - 0.5).abs() < 1e-12);
            assert!(squash(-10.0, k) > 0.0);
            assert!(squash(10.0, k) < 1.0);
            assert!(squash(0.8, k) > squash(0.2, k));
        }
    }

    #[test]
    fn identical_colors_are_fully_preserved() {
        use crate::color::Rgb;
        use crate::palette::Value;

        let scale = PreservationScale {
            hue: Some((0.0, 6.0)),
            tone: Some((0.0, 60.0)),
        };
        let v = Value::from_rgb(Rgb::new(120, 60, 200));
        assert!(scale.fully_preserved(&v, &v));
        // Zero tolerances reject any drifted candidate.
        let drifted = Value::from_rgb(Rgb::new(60, 120, 200));
        assert!(!scale.fully_preserved(&v, &drifted));
    }

    #[test]
    fn unconstrained_scale_yields_no_raw_score() {
        use crate::color::Rgb;
        use crate::palette::Value;

        let scale = PreservationScale {
            hue: None,
            tone: None,
        };
        let a = Value::from_rgb(Rgb::new(10, 20, 30));
        let b = Value::from_rgb(Rgb::new(200, 100, 0));
        assert!(scale.raw(&a, &b).is_none());
    }
}
