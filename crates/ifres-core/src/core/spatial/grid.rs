use super::{SpatialIndex, squared_radius};
use crate::core::utils::geometry::{is_finite_point, squared_distance};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Smallest cell edge the grid will use, in Ångströms.
const MIN_CELL_SIZE: f64 = 1.0;

type CellKey = (i64, i64, i64);

/// Uniform cell list over the indexed points.
///
/// Space is cut into cubes of edge `cell_size`; only occupied cells are stored. A query with
/// radius `r` visits every cell overlapping the axis-aligned box of half-width `r` around the
/// query point, so the grid performs best when `cell_size` is close to the query radius.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    points: Vec<Point3<f64>>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    pub fn new(points: &[Point3<f64>], expected_radius: f64) -> Self {
        let cell_size = if expected_radius.is_finite() && expected_radius > MIN_CELL_SIZE {
            expected_radius
        } else {
            MIN_CELL_SIZE
        };

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (index, point) in points.iter().enumerate() {
            cells
                .entry(cell_of(point, cell_size))
                .or_default()
                .push(index);
        }

        Self {
            cell_size,
            points: points.to_vec(),
            cells,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Calls `visit` with the index of every point that may lie within `radius` of `query`,
    /// stopping early once `visit` returns `true`. Returns whether it stopped early.
    fn scan_candidates<F>(&self, query: &Point3<f64>, radius: f64, mut visit: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let pad = radius * 1.0e-9 + 1.0e-9;
        let reach = radius + pad;
        let lo = cell_of(&(query - Vector3::repeat(reach)), self.cell_size);
        let hi = cell_of(&(query + Vector3::repeat(reach)), self.cell_size);

        let span = |a: i64, b: i64| (b as f64 - a as f64 + 1.0).max(0.0);
        let box_cells = span(lo.0, hi.0) * span(lo.1, hi.1) * span(lo.2, hi.2);

        if box_cells > self.cells.len() as f64 {
            // The box covers more cells than are occupied; walk the occupied ones instead.
            for (key, members) in &self.cells {
                let inside = (lo.0..=hi.0).contains(&key.0)
                    && (lo.1..=hi.1).contains(&key.1)
                    && (lo.2..=hi.2).contains(&key.2);
                if inside && members.iter().any(|&i| visit(i)) {
                    return true;
                }
            }
            return false;
        }

        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    if let Some(members) = self.cells.get(&(cx, cy, cz)) {
                        if members.iter().any(|&i| visit(i)) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

fn cell_of(point: &Point3<f64>, cell_size: f64) -> CellKey {
    (
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
        (point.z / cell_size).floor() as i64,
    )
}

impl SpatialIndex for GridIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn any_within(&self, query: &Point3<f64>, radius: f64) -> bool {
        let Some(radius_sq) = squared_radius(radius) else {
            return false;
        };
        if self.points.is_empty() || !is_finite_point(query) {
            return false;
        }
        self.scan_candidates(query, radius, |i| {
            squared_distance(&self.points[i], query) <= radius_sq
        })
    }

    fn within(&self, query: &Point3<f64>, radius: f64) -> Vec<usize> {
        let Some(radius_sq) = squared_radius(radius) else {
            return Vec::new();
        };
        if self.points.is_empty() || !is_finite_point(query) {
            return Vec::new();
        }
        let mut hits = Vec::new();
        self.scan_candidates(query, radius, |i| {
            if squared_distance(&self.points[i], query) <= radius_sq {
                hits.push(i);
            }
            false
        });
        hits.sort_unstable();
        hits
    }
}
