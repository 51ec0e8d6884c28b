// ===== chromaforge/src/palettes.rs =====
use crate::color::Rgb;
use strum_macros::{Display, EnumIter, EnumString};

/// Named reference palettes, mostly useful as starting points and as
/// fixtures for the adjuster.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownPalette {
    /// Wong (Nature Methods, 2011) colorblind-safe eight.
    Wong,
    /// Paul Tol's bright qualitative palette.
    TolBright,
    /// Classic traffic-light triple; a hard case for red-green CVD.
    TrafficLight,
}

impl KnownPalette {
    pub fn colors(&self) -> Vec<Rgb> {
        match self {
            Self::Wong => vec![
                Rgb::new(0, 0, 0),
                Rgb::new(230, 159, 0),
                Rgb::new(86, 180, 233),
                Rgb::new(0, 158, 115),
                Rgb::new(240, 228, 66),
                Rgb::new(0, 114, 178),
                Rgb::new(213, 94, 0),
                Rgb::new(204, 121, 167),
            ],
            Self::TolBright => vec![
                Rgb::new(68, 119, 170),
                Rgb::new(102, 204, 238),
                Rgb::new(34, 136, 51),
                Rgb::new(204, 187, 68),
                Rgb::new(238, 102, 119),
                Rgb::new(170, 51, 119),
                Rgb::new(187, 187, 187),
            ],
            Self::TrafficLight => vec![
                Rgb::new(220, 40, 30),
                Rgb::new(240, 200, 40),
                Rgb::new(50, 160, 60),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_palette_has_distinct_colors() {
        for palette in KnownPalette::iter() {
            let colors = palette.colors();
            for i in 0..colors.len() {
                for j in (i + 1)..colors.len() {
                    assert_ne!(colors[i], colors[j], "{palette}");
                }
            }
        }
    }
}
