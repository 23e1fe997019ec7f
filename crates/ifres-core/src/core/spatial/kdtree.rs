use super::{SpatialIndex, squared_radius};
use crate::core::utils::geometry::squared_distance;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::HashMap;

/// Relative slack added to the squared radius handed to the tree, so that points sitting
/// exactly on the sphere are never pruned before the exact comparison.
const RADIUS_SLACK: f64 = 1.0e-9;

/// k-d tree index backed by `kiddo`'s balanced, build-once tree.
///
/// Coincident points are collapsed into a single tree entry that remembers every original
/// index. Many points sharing one coordinate on a single axis (coplanar or fixed-precision
/// input) are fine: the immutable tree shifts its split points instead of overflowing a
/// bucket.
pub struct KdTreeIndex {
    tree: Option<ImmutableKdTree<f64, 3>>,
    unique_points: Vec<Point3<f64>>,
    members: Vec<Vec<usize>>,
    len: usize,
}

impl KdTreeIndex {
    pub fn new(points: &[Point3<f64>]) -> Self {
        let mut slot_by_position: HashMap<[u64; 3], usize> = HashMap::with_capacity(points.len());
        let mut unique_points: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        let mut members: Vec<Vec<usize>> = Vec::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            // Adding 0.0 folds -0.0 into +0.0 so both hash alike.
            let key = [
                (point.x + 0.0).to_bits(),
                (point.y + 0.0).to_bits(),
                (point.z + 0.0).to_bits(),
            ];
            let slot = *slot_by_position.entry(key).or_insert_with(|| {
                unique_points.push(*point);
                members.push(Vec::new());
                unique_points.len() - 1
            });
            members[slot].push(index);
        }

        let coordinates: Vec<[f64; 3]> = unique_points.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree = (!coordinates.is_empty())
            .then(|| ImmutableKdTree::<f64, 3>::new_from_slice(&coordinates));

        Self {
            tree,
            unique_points,
            members,
            len: points.len(),
        }
    }
}

impl SpatialIndex for KdTreeIndex {
    fn len(&self) -> usize {
        self.len
    }

    fn any_within(&self, query: &Point3<f64>, radius: f64) -> bool {
        let Some(radius_sq) = squared_radius(radius) else {
            return false;
        };
        let Some(tree) = &self.tree else {
            return false;
        };
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y, query.z]);
        self.unique_points
            .get(nearest.item as usize)
            .is_some_and(|p| squared_distance(p, query) <= radius_sq)
    }

    fn within(&self, query: &Point3<f64>, radius: f64) -> Vec<usize> {
        let Some(radius_sq) = squared_radius(radius) else {
            return Vec::new();
        };
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let search_sq = radius_sq * (1.0 + RADIUS_SLACK) + f64::MIN_POSITIVE;
        let mut hits: Vec<usize> = tree
            .within_unsorted::<SquaredEuclidean>(&[query.x, query.y, query.z], search_sq)
            .into_iter()
            .map(|neighbour| neighbour.item as usize)
            .filter(|&slot| squared_distance(&self.unique_points[slot], query) <= radius_sq)
            .flat_map(|slot| self.members[slot].iter().copied())
            .collect();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_collapsed_but_all_reported() {
        let points = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(5.0, 5.0, 5.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let index = KdTreeIndex::new(&points);
        assert_eq!(index.len(), 5);
        assert_eq!(index.unique_points.len(), 3);
        assert_eq!(index.within(&Point3::new(1.0, 1.0, 1.0), 0.0), vec![0, 2]);
        assert_eq!(index.within(&Point3::origin(), 0.0), vec![3, 4]);
    }

    #[test]
    fn many_points_on_one_axis_value_build_and_query() {
        let points: Vec<Point3<f64>> = (0..200)
            .map(|i| Point3::new(1.5, (i % 20) as f64, (i / 20) as f64))
            .collect();
        let index = KdTreeIndex::new(&points);
        assert_eq!(index.len(), 200);
        assert!(index.any_within(&Point3::new(1.5, 19.0, 9.0), 0.0));
        assert!(!index.any_within(&Point3::new(4.0, 0.0, 0.0), 2.4));
        assert_eq!(index.within(&Point3::new(1.5, 0.0, 0.0), 1.0), vec![0, 1, 20]);
    }

    #[test]
    fn empty_input_builds_no_tree() {
        let index = KdTreeIndex::new(&[]);
        assert!(index.tree.is_none());
        assert!(!index.any_within(&Point3::origin(), 100.0));
        assert!(index.within(&Point3::origin(), 100.0).is_empty());
    }

    #[test]
    fn nearest_point_decides_existence() {
        let points = vec![Point3::new(0.0, 0.0, 6.0), Point3::new(0.0, 0.0, 20.0)];
        let index = KdTreeIndex::new(&points);
        assert!(index.any_within(&Point3::origin(), 6.0));
        assert!(!index.any_within(&Point3::origin(), 5.999));
        assert!(index.any_within(&Point3::new(0.0, 0.0, 21.0), 1.0));
    }
}
