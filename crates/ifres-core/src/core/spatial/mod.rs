//! # Spatial Index Module
//!
//! Radius queries over a fixed set of 3-D points.
//!
//! An index is built once from a slice of points and then queried many times. Every
//! implementation answers the same two questions with identical results:
//!
//! - [`SpatialIndex::any_within`] - is at least one indexed point inside the closed ball of
//!   radius `r` around the query point?
//! - [`SpatialIndex::within`] - which indexed points (by build-order index) are inside it?
//!
//! Distances are compared in squared form. A point at exactly distance `r` is a hit, a
//! radius of zero matches only coincident points, and a negative or NaN radius matches
//! nothing. Indexes are immutable after construction and are `Send + Sync`, so a single
//! index can be shared by many worker threads without locking.
//!
//! ## Implementations
//!
//! - [`kdtree::KdTreeIndex`] - k-d tree (default)
//! - [`grid::GridIndex`] - uniform cell list, best when the cell edge matches the query radius
//! - [`linear::LinearScanIndex`] - brute force, the correctness baseline

pub mod grid;
pub mod kdtree;
pub mod linear;

use nalgebra::Point3;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub trait SpatialIndex: Send + Sync {
    /// Returns the number of indexed points.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if any indexed point lies within `radius` (inclusive) of `query`.
    fn any_within(&self, query: &Point3<f64>, radius: f64) -> bool;

    /// Returns the build-order indices of all points within `radius` (inclusive) of
    /// `query`, sorted ascending.
    fn within(&self, query: &Point3<f64>, radius: f64) -> Vec<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexKind {
    #[default]
    KdTree,
    Grid,
    LinearScan,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown spatial index kind '{0}'. Expected 'kdtree', 'grid' or 'linear'.")]
pub struct ParseIndexKindError(pub String);

impl FromStr for IndexKind {
    type Err = ParseIndexKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kdtree" | "kd-tree" | "kd_tree" => Ok(IndexKind::KdTree),
            "grid" | "cell-list" | "cell_list" => Ok(IndexKind::Grid),
            "linear" | "linear-scan" | "linear_scan" => Ok(IndexKind::LinearScan),
            _ => Err(ParseIndexKindError(s.to_string())),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                IndexKind::KdTree => "kdtree",
                IndexKind::Grid => "grid",
                IndexKind::LinearScan => "linear",
            }
        )
    }
}

/// Builds a spatial index of the requested kind over `points`.
///
/// # Arguments
///
/// * `kind` - Which implementation to build.
/// * `points` - The points to index; their positions in this slice are the indices reported
///   by [`SpatialIndex::within`].
/// * `expected_radius` - The radius most queries will use. Only the grid uses it, as its
///   cell edge length.
pub fn build_index(
    kind: IndexKind,
    points: &[Point3<f64>],
    expected_radius: f64,
) -> Box<dyn SpatialIndex> {
    match kind {
        IndexKind::KdTree => Box::new(kdtree::KdTreeIndex::new(points)),
        IndexKind::Grid => Box::new(grid::GridIndex::new(points, expected_radius)),
        IndexKind::LinearScan => Box::new(linear::LinearScanIndex::new(points)),
    }
}

/// Returns the squared query radius, or `None` if the radius cannot match anything.
#[inline]
pub(crate) fn squared_radius(radius: f64) -> Option<f64> {
    if radius >= 0.0 && !radius.is_nan() {
        Some(radius * radius)
    } else {
        None
    }
}
