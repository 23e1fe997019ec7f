use nalgebra::Point3;

/// Squared Euclidean distance between two points.
///
/// Every radius comparison in the crate goes through this function so that all spatial
/// indexes agree bit-for-bit on boundary cases.
#[inline]
pub fn squared_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

pub fn is_finite_point(point: &Point3<f64>) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_is_symmetric() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        assert_eq!(squared_distance(&a, &b), 25.0);
        assert_eq!(squared_distance(&b, &a), 25.0);
    }

    #[test]
    fn is_finite_point_rejects_nan_and_infinity() {
        assert!(is_finite_point(&Point3::new(0.0, -1.0, 1.0e300)));
        assert!(!is_finite_point(&Point3::new(f64::NAN, 0.0, 0.0)));
        assert!(!is_finite_point(&Point3::new(0.0, f64::NEG_INFINITY, 0.0)));
    }
}
