// ===== chromaforge/src/palette/scheme.rs =====
use crate::color::space::Rgb;
use crate::color::vision::Vision;
use crate::error::{CfResult, ChromaForgeError};
use crate::palette::value::Value;
use crate::partition::CellMap;
use itertools::Itertools;
use serde::Serialize;

/// One adjacent pair under one vision, with its perceptual difference.
/// Derived data: recomputed whenever a Scheme is built.
#[derive(Debug, Clone, Serialize)]
pub struct Combination {
    pub index1: usize,
    pub index2: usize,
    pub color1: Rgb,
    pub color2: Rgb,
    pub difference: f64,
    pub vision: Vision,
}

/// The ordered colors under adjustment plus the adjacency graph of
/// pairs that must stay distinguishable.
///
/// Everything derived (combinations, bottleneck) is computed once at
/// construction. After that a Scheme only mutates through
/// `set_fixed_flags` and the crate-internal quality setter used when
/// deriving a Scheme from a solver assignment.
#[derive(Debug, Clone)]
pub struct Scheme {
    values: Vec<Value>,
    adjacency: Vec<(usize, usize)>,
    fixed: Vec<bool>,
    quality: f64,
    bottleneck_index: usize,
    bottleneck_size: f64,
    lowest: [Option<Combination>; Vision::COUNT],
    combinations: Vec<Combination>,
}

impl Scheme {
    /// Build from colors and an optional adjacency list. `None` means
    /// the complete graph (every pair i < j must stay distinct).
    pub fn new(colors: Vec<Rgb>, adjacency: Option<Vec<(usize, usize)>>) -> CfResult<Self> {
        let n = colors.len();
        let adjacency = match adjacency {
            Some(pairs) => {
                let mut normalized = Vec::with_capacity(pairs.len());
                for (i, j) in pairs {
                    if i == j {
                        return Err(ChromaForgeError::Validation(format!(
                            "adjacency pair ({i}, {j}) is a self-pair"
                        )));
                    }
                    if i >= n || j >= n {
                        return Err(ChromaForgeError::Validation(format!(
                            "adjacency pair ({i}, {j}) out of range for {n} colors"
                        )));
                    }
                    normalized.push((i.min(j), i.max(j)));
                }
                normalized
            }
            None => (0..n).tuple_combinations().collect(),
        };

        let values: Vec<Value> = colors.into_iter().map(Value::from_rgb).collect();

        // Pairwise differences for every adjacent pair under every
        // vision, sorted ascending, with the per-vision minimum kept.
        let mut combinations = Vec::with_capacity(adjacency.len() * Vision::COUNT);
        let mut lowest: [Option<Combination>; Vision::COUNT] = [None, None, None, None];
        for &(i, j) in &adjacency {
            for vision in Vision::ALL {
                let combo = Combination {
                    index1: i,
                    index2: j,
                    color1: values[i].rgb(),
                    color2: values[j].rgb(),
                    difference: values[i].difference(&values[j], vision),
                    vision,
                };
                let slot = &mut lowest[vision.index()];
                if slot
                    .as_ref()
                    .map(|best| combo.difference < best.difference)
                    .unwrap_or(true)
                {
                    *slot = Some(combo.clone());
                }
                combinations.push(combo);
            }
        }
        combinations.sort_by(|a, b| a.difference.total_cmp(&b.difference));

        let (bottleneck_index, bottleneck_size) = bottleneck_of(&values, &adjacency);

        Ok(Self {
            fixed: vec![false; values.len()],
            quality: 1.0,
            values,
            adjacency,
            bottleneck_index,
            bottleneck_size,
            lowest,
            combinations,
        })
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed[index]
    }

    pub fn set_fixed_flags(&mut self, flags: Vec<bool>) -> CfResult<()> {
        if flags.len() != self.values.len() {
            return Err(ChromaForgeError::Validation(format!(
                "{} fixed flags for {} colors",
                flags.len(),
                self.values.len()
            )));
        }
        self.fixed = flags;
        Ok(())
    }

    pub fn value(&self, index: usize) -> &Value {
        &self.values[index]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The color at `index` as seen under `vision`.
    pub fn color(&self, index: usize, vision: Vision) -> Rgb {
        self.values[index].projected(vision)
    }

    pub fn adjacencies(&self) -> &[(usize, usize)] {
        &self.adjacency
    }

    /// Per-node neighbor lists. With `omit = Some(k)` node k is
    /// excluded entirely: its own list is empty and it appears in no
    /// other list.
    pub fn adjacency_table(&self, omit: Option<usize>) -> Vec<Vec<usize>> {
        let mut table = vec![Vec::new(); self.values.len()];
        for &(i, j) in &self.adjacency {
            if omit == Some(i) || omit == Some(j) {
                continue;
            }
            table[i].push(j);
            table[j].push(i);
        }
        table
    }

    pub fn difference(&self, i: usize, j: usize, vision: Vision) -> f64 {
        self.values[i].difference(&self.values[j], vision)
    }

    /// The slot with the least perceptual room, per the spatial
    /// partition's coarse cell-size estimate.
    pub fn bottleneck_index(&self) -> usize {
        self.bottleneck_index
    }

    pub fn bottleneck_size(&self) -> f64 {
        self.bottleneck_size
    }

    /// Smallest pairwise difference under `vision`; infinite when the
    /// scheme has no adjacent pairs.
    pub fn lowest_difference(&self, vision: Vision) -> f64 {
        self.lowest[vision.index()]
            .as_ref()
            .map(|c| c.difference)
            .unwrap_or(f64::INFINITY)
    }

    /// The lowest-difference combination for one vision, or with
    /// `None` the minimum across all visions (ties broken by
    /// enumeration order T, P, D, M).
    pub fn lowest_combination(&self, vision: Option<Vision>) -> Option<&Combination> {
        match vision {
            Some(v) => self.lowest[v.index()].as_ref(),
            None => {
                let mut best: Option<&Combination> = None;
                for v in Vision::ALL {
                    if let Some(c) = self.lowest[v.index()].as_ref() {
                        if best.map(|b| c.difference < b.difference).unwrap_or(true) {
                            best = Some(c);
                        }
                    }
                }
                best
            }
        }
    }

    /// All combinations for the enabled visions, ascending by
    /// difference. `enabled` is indexed by `Vision::index()`.
    pub fn combination_list(&self, enabled: &[bool; Vision::COUNT]) -> Vec<Combination> {
        self.combinations
            .iter()
            .filter(|c| enabled[c.vision.index()])
            .cloned()
            .collect()
    }

    /// Sum of same-index trichromatic differences against another
    /// scheme of the same size.
    pub fn total_difference_from(&self, other: &Scheme) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a.difference(b, Vision::Trichromacy))
            .sum()
    }

    /// Worst satisfaction degree of the last solve, else 1.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub(crate) fn set_quality(&mut self, quality: f64) {
        self.quality = quality;
    }

    /// Average per-slot perceptual drift between two index-aligned
    /// schemes.
    pub fn ave_delta_e(original: &Scheme, modified: &Scheme) -> f64 {
        ave_drift(original, modified, |a, b| a.difference(b, Vision::Trichromacy))
    }

    /// Average per-slot circular hue drift.
    pub fn ave_delta_h(original: &Scheme, modified: &Scheme) -> f64 {
        ave_drift(original, modified, |a, b| a.delta_hue(b))
    }

    /// Average per-slot tone-plane drift.
    pub fn ave_delta_t(original: &Scheme, modified: &Scheme) -> f64 {
        ave_drift(original, modified, |a, b| a.delta_tone(b))
    }
}

fn ave_drift(a: &Scheme, b: &Scheme, f: impl Fn(&Value, &Value) -> f64) -> f64 {
    let n = a.values.len().min(b.values.len());
    if n == 0 {
        return 0.0;
    }
    a.values
        .iter()
        .zip(b.values.iter())
        .map(|(x, y)| f(x, y))
        .sum::<f64>()
        / n as f64
}

fn bottleneck_of(values: &[Value], adjacency: &[(usize, usize)]) -> (usize, f64) {
    if values.is_empty() {
        return (0, 0.0);
    }
    let sites: Vec<[f64; 3]> = values
        .iter()
        .map(|v| v.lab(Vision::Trichromacy))
        .collect();
    let mut table = vec![Vec::new(); values.len()];
    for &(i, j) in adjacency {
        table[i].push(j);
        table[j].push(i);
    }
    let map = CellMap::new(sites, table);
    let mut index = 0;
    let mut size = map.cell_size(0);
    for i in 1..map.site_count() {
        let s = map.cell_size(i);
        if s < size {
            index = i;
            size = s;
        }
    }
    (index, size)
}
