// ===== chromaforge/src/partition.rs =====
use crate::consts::{
    BOX_AB_MAX, BOX_AB_MIN, BOX_L_MAX, BOX_L_MIN, CELL_SIZE_RESOLUTION,
};

/// Neighbor-restricted Voronoi partition of the fixed Lab box:
/// axis 0 is lightness [0, 100], axes 1-2 are a*/b* [-127, 127].
///
/// A grid point belongs to a site's cell when it is at least as close
/// to that site as to each of the site's listed neighbors. Sites that
/// are not neighbors do not constrain each other's cells.
pub struct CellMap {
    sites: Vec<[f64; 3]>,
    neighbors: Vec<Vec<usize>>,
}

impl CellMap {
    pub fn new(sites: Vec<[f64; 3]>, neighbors: Vec<Vec<usize>>) -> Self {
        debug_assert_eq!(sites.len(), neighbors.len());
        Self { sites, neighbors }
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Grid points (cell centers, `resolution` steps per axis) owned
    /// by the given site.
    pub fn samples(&self, site: usize, resolution: usize) -> Vec<[f64; 3]> {
        let mut out = Vec::new();
        if resolution == 0 {
            return out;
        }
        let step =
            |lo: f64, hi: f64, i: usize| lo + (hi - lo) * (i as f64 + 0.5) / resolution as f64;
        for li in 0..resolution {
            let l = step(BOX_L_MIN, BOX_L_MAX, li);
            for ai in 0..resolution {
                let a = step(BOX_AB_MIN, BOX_AB_MAX, ai);
                for bi in 0..resolution {
                    let b = step(BOX_AB_MIN, BOX_AB_MAX, bi);
                    let p = [l, a, b];
                    if self.owns(site, p) {
                        out.push(p);
                    }
                }
            }
        }
        out
    }

    /// Coarse cell-size estimate: owned grid points at a fixed
    /// internal resolution. The slot with the smallest estimate has
    /// the least room and is the bottleneck.
    pub fn cell_size(&self, site: usize) -> f64 {
        self.samples(site, CELL_SIZE_RESOLUTION).len() as f64
    }

    fn owns(&self, site: usize, p: [f64; 3]) -> bool {
        let d_site = dist2(self.sites[site], p);
        self.neighbors[site]
            .iter()
            .all(|&n| d_site <= dist2(self.sites[n], p))
    }
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    dl * dl + da * da + db * db
}
