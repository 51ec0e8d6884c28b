// ===== chromaforge/src/palette/value.rs =====
use crate::color::space::{self, Lab, Rgb, ToneCoord};
use crate::color::vision::{simulate_linear, Vision};

/// One color together with its precomputed projection under every
/// vision: the simulated color, its CIELAB coordinates and its
/// hue/tone coordinate. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    rgb: Rgb,
    projections: [Projection; Vision::COUNT],
}

#[derive(Debug, Clone, PartialEq)]
struct Projection {
    rgb: Rgb,
    lab: Lab,
    tone: ToneCoord,
}

impl Value {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let lin = rgb.to_linear();
        let projections = Vision::ALL.map(|v| {
            let sim = simulate_linear(lin, v);
            let lab = space::linear_to_lab(sim);
            Projection {
                rgb: Rgb::from_linear(sim),
                lab,
                tone: ToneCoord::from_lab(lab),
            }
        });
        Self { rgb, projections }
    }

    /// Build from a CIELAB triplet; `None` when the coordinate falls
    /// outside the displayable gamut. Callers treat this as absence,
    /// not as an error.
    pub fn from_lab(lab: Lab) -> Option<Self> {
        space::lab_to_rgb(lab).map(Self::from_rgb)
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// The simulated color under the given vision.
    pub fn projected(&self, vision: Vision) -> Rgb {
        self.projections[vision.index()].rgb
    }

    pub fn lab(&self, vision: Vision) -> Lab {
        self.projections[vision.index()].lab
    }

    pub fn tone(&self, vision: Vision) -> &ToneCoord {
        &self.projections[vision.index()].tone
    }

    /// Perceptual distance between the two projections under `vision`.
    /// Non-negative, symmetric, zero iff the projections coincide.
    pub fn difference(&self, other: &Value, vision: Vision) -> f64 {
        space::delta_e(self.lab(vision), other.lab(vision))
    }

    /// Circular hue drift (trichromatic tone circle).
    pub fn delta_hue(&self, other: &Value) -> f64 {
        self.tone(Vision::Trichromacy)
            .hue_distance(other.tone(Vision::Trichromacy))
    }

    /// Lightness/chroma drift (trichromatic tone plane).
    pub fn delta_tone(&self, other: &Value) -> f64 {
        self.tone(Vision::Trichromacy)
            .tone_distance(other.tone(Vision::Trichromacy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_difference_is_zero_for_every_vision() {
        let v = Value::from_rgb(Rgb::new(180, 60, 40));
        for vision in Vision::ALL {
            assert_eq!(v.difference(&v, vision), 0.0);
        }
    }

    #[test]
    fn from_lab_rejects_out_of_gamut() {
        assert!(Value::from_lab([100.0, 127.0, -127.0]).is_none());
        assert!(Value::from_lab([50.0, 0.0, 0.0]).is_some());
    }

    #[test]
    fn difference_is_symmetric() {
        let a = Value::from_rgb(Rgb::new(200, 40, 40));
        let b = Value::from_rgb(Rgb::new(50, 90, 200));
        for vision in Vision::ALL {
            assert_eq!(a.difference(&b, vision), b.difference(&a, vision));
        }
    }
}
