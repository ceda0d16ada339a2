//! Point and vector types

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Midpoint of two points
pub fn midpoint(a: &Point3d, b: &Point3d) -> Point3d {
    Point3d::from((a.coords + b.coords) * 0.5)
}

/// Whether every coordinate of the point is finite
pub fn is_finite(p: &Point3d) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoint() {
        let m = midpoint(&Point3d::new(0.0, 0.0, 0.0), &Point3d::new(2.0, -4.0, 1.0));
        assert_relative_eq!(m, Point3d::new(1.0, -2.0, 0.5));
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite(&Point3d::new(1.0, 2.0, 3.0)));
        assert!(!is_finite(&Point3d::new(f64::NAN, 0.0, 0.0)));
        assert!(!is_finite(&Point3d::new(0.0, f64::INFINITY, 0.0)));
    }
}
