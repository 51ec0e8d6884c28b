// ===== chromaforge/src/color/vision.rs =====
use crate::color::space::Rgb;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The supported color-perception conditions, in fixed enumeration
/// order. Ties across visions are broken by this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Vision {
    Trichromacy,
    Protanopia,
    Deuteranopia,
    Monochromacy,
}

impl Vision {
    pub const COUNT: usize = 4;

    pub const ALL: [Vision; Vision::COUNT] = [
        Vision::Trichromacy,
        Vision::Protanopia,
        Vision::Deuteranopia,
        Vision::Monochromacy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// Linear RGB -> LMS and back (Vienot et al. 1999). Dichromat
// projections collapse one cone axis onto the remaining two.
const RGB_TO_LMS: [[f64; 3]; 3] = [
    [17.8824, 43.5161, 4.11935],
    [3.45565, 27.1554, 3.86714],
    [0.0299566, 0.184309, 1.46709],
];

const LMS_TO_RGB: [[f64; 3]; 3] = [
    [0.0809444479, -0.130504409, 0.116721066],
    [-0.0102485335, 0.0540193266, -0.113614708],
    [-0.000365296938, -0.00412161469, 0.693511405],
];

fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Project linear RGB channels into the given vision. Channels are
/// clamped back into [0, 1] so the result is always displayable.
pub fn simulate_linear(lin: [f64; 3], vision: Vision) -> [f64; 3] {
    let out = match vision {
        Vision::Trichromacy => lin,
        Vision::Protanopia => {
            let lms = mul3(&RGB_TO_LMS, lin);
            let l = 2.02344 * lms[1] - 2.52581 * lms[2];
            mul3(&LMS_TO_RGB, [l, lms[1], lms[2]])
        }
        Vision::Deuteranopia => {
            let lms = mul3(&RGB_TO_LMS, lin);
            let m = 0.494207 * lms[0] + 1.24827 * lms[2];
            mul3(&LMS_TO_RGB, [lms[0], m, lms[2]])
        }
        Vision::Monochromacy => {
            let y = 0.2126 * lin[0] + 0.7152 * lin[1] + 0.0722 * lin[2];
            [y, y, y]
        }
    };
    [
        out[0].clamp(0.0, 1.0),
        out[1].clamp(0.0, 1.0),
        out[2].clamp(0.0, 1.0),
    ]
}

pub fn simulate(rgb: Rgb, vision: Vision) -> Rgb {
    Rgb::from_linear(simulate_linear(rgb.to_linear(), vision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn enumeration_order_is_fixed() {
        let order: Vec<Vision> = Vision::iter().collect();
        assert_eq!(
            order,
            vec![
                Vision::Trichromacy,
                Vision::Protanopia,
                Vision::Deuteranopia,
                Vision::Monochromacy
            ]
        );
        assert_eq!(Vision::Monochromacy.index(), 3);
    }

    #[test]
    fn trichromacy_is_identity() {
        let c = Rgb::new(120, 33, 210);
        assert_eq!(simulate(c, Vision::Trichromacy), c);
    }

    #[test]
    fn monochromacy_is_gray() {
        let g = simulate(Rgb::new(200, 30, 40), Vision::Monochromacy);
        assert_eq!(g.r, g.g);
        assert_eq!(g.g, g.b);
    }

    #[test]
    fn red_green_collapse_under_deuteranopia() {
        // Pure red and a chosen green land close together for a
        // deuteranope while staying far apart for a trichromat.
        use crate::color::space::delta_e;
        let red = Rgb::new(220, 30, 30);
        let green = Rgb::new(90, 150, 30);
        let tri = delta_e(red.to_lab(), green.to_lab());
        let deut = delta_e(
            simulate(red, Vision::Deuteranopia).to_lab(),
            simulate(green, Vision::Deuteranopia).to_lab(),
        );
        assert!(deut < tri);
    }

    #[test]
    fn gray_is_stable_under_every_vision() {
        let gray = Rgb::new(128, 128, 128);
        for v in Vision::iter() {
            let p = simulate(gray, v);
            assert!((p.r as i32 - 128).abs() <= 2, "{v}: {p:?}");
            assert!((p.g as i32 - 128).abs() <= 2, "{v}: {p:?}");
            assert!((p.b as i32 - 128).abs() <= 2, "{v}: {p:?}");
        }
    }
}
