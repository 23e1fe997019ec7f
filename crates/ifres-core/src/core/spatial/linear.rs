use super::{SpatialIndex, squared_radius};
use crate::core::utils::geometry::squared_distance;
use nalgebra::Point3;

/// Brute-force index that compares the query against every stored point.
///
/// Linear in the number of points per query. It is the reference the other indexes are
/// tested against and is perfectly adequate for a few hundred points.
#[derive(Debug, Clone, Default)]
pub struct LinearScanIndex {
    points: Vec<Point3<f64>>,
}

impl LinearScanIndex {
    pub fn new(points: &[Point3<f64>]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl SpatialIndex for LinearScanIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn any_within(&self, query: &Point3<f64>, radius: f64) -> bool {
        let Some(radius_sq) = squared_radius(radius) else {
            return false;
        };
        self.points
            .iter()
            .any(|p| squared_distance(p, query) <= radius_sq)
    }

    fn within(&self, query: &Point3<f64>, radius: f64) -> Vec<usize> {
        let Some(radius_sq) = squared_radius(radius) else {
            return Vec::new();
        };
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| squared_distance(p, query) <= radius_sq)
            .map(|(i, _)| i)
            .collect()
    }
}
