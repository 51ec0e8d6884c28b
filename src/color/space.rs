// ===== chromaforge/src/color/space.rs =====
use crate::consts::{DEGREES_PER_HUE_STEP, GAMUT_EPSILON, HUE_PERIOD};
use serde::{Deserialize, Serialize};

/// CIELAB coordinates: [L*, a*, b*].
pub type Lab = [f64; 3];

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear-light RGB channels in [0, 1].
    pub fn to_linear(self) -> [f64; 3] {
        [
            srgb_to_linear(self.r as f64 / 255.0),
            srgb_to_linear(self.g as f64 / 255.0),
            srgb_to_linear(self.b as f64 / 255.0),
        ]
    }

    pub fn from_linear(lin: [f64; 3]) -> Self {
        let q = |c: f64| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        Self::new(q(lin[0]), q(lin[1]), q(lin[2]))
    }

    pub fn to_lab(self) -> Lab {
        xyz_to_lab(linear_to_xyz(self.to_linear()))
    }
}

/// Hue/tone coordinate of a color: a cyclic hue (period 24) plus a
/// Euclidean lightness/chroma plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneCoord {
    /// Position on the 24-step hue circle, [0, 24).
    pub hue: f64,
    pub lightness: f64,
    pub chroma: f64,
}

impl ToneCoord {
    pub fn from_lab(lab: Lab) -> Self {
        let chroma = lab[1].hypot(lab[2]);
        let mut deg = lab[2].atan2(lab[1]).to_degrees();
        if deg < 0.0 {
            deg += 360.0;
        }
        Self {
            hue: deg / DEGREES_PER_HUE_STEP,
            lightness: lab[0],
            chroma,
        }
    }

    /// Circular hue distance: min(|a-b|, 24-|a-b|).
    pub fn hue_distance(&self, other: &ToneCoord) -> f64 {
        hue_distance(self.hue, other.hue)
    }

    /// Euclidean distance on the lightness/chroma plane.
    pub fn tone_distance(&self, other: &ToneCoord) -> f64 {
        (self.lightness - other.lightness).hypot(self.chroma - other.chroma)
    }
}

pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % HUE_PERIOD;
    d.min(HUE_PERIOD - d)
}

/// CIE76 distance between two Lab coordinates.
pub fn delta_e(a: Lab, b: Lab) -> f64 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    (dl * dl + da * da + db * db).sqrt()
}

/// Scalar salience heuristic: saturated, mid-lightness colors pop.
/// Only relative values (normalized per scheme) are consumed.
pub fn conspicuity(lab: Lab) -> f64 {
    let chroma = lab[1].hypot(lab[2]);
    let mid = (50.0 - (lab[0] - 50.0).abs()).max(0.0);
    chroma + mid * 0.3
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

// D65 reference white.
const WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

fn linear_to_xyz(lin: [f64; 3]) -> [f64; 3] {
    let [r, g, b] = lin;
    [
        0.4124564 * r + 0.3575761 * g + 0.1804375 * b,
        0.2126729 * r + 0.7151522 * g + 0.0721750 * b,
        0.0193339 * r + 0.1191920 * g + 0.9503041 * b,
    ]
}

fn xyz_to_linear(xyz: [f64; 3]) -> [f64; 3] {
    let [x, y, z] = xyz;
    [
        3.2404542 * x - 1.5371385 * y - 0.4985314 * z,
        -0.9692660 * x + 1.8760108 * y + 0.0415560 * z,
        0.0556434 * x - 0.2040259 * y + 1.0572252 * z,
    ]
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

pub fn xyz_to_lab(xyz: [f64; 3]) -> Lab {
    let fx = lab_f(xyz[0] / WHITE[0]);
    let fy = lab_f(xyz[1] / WHITE[1]);
    let fz = lab_f(xyz[2] / WHITE[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

pub fn lab_to_xyz(lab: Lab) -> [f64; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = fy + lab[1] / 500.0;
    let fz = fy - lab[2] / 200.0;
    [
        WHITE[0] * lab_f_inv(fx),
        WHITE[1] * lab_f_inv(fy),
        WHITE[2] * lab_f_inv(fz),
    ]
}

pub fn linear_to_lab(lin: [f64; 3]) -> Lab {
    xyz_to_lab(linear_to_xyz(lin))
}

/// Lab to sRGB, or `None` when the color is not displayable.
pub fn lab_to_rgb(lab: Lab) -> Option<Rgb> {
    let lin = xyz_to_linear(lab_to_xyz(lab));
    if lin
        .iter()
        .any(|&c| c < -GAMUT_EPSILON || c > 1.0 + GAMUT_EPSILON)
    {
        return None;
    }
    Some(Rgb::from_linear(lin))
}
