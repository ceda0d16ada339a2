//! Quadric error metrics
//!
//! Every face contributes the quadric `p pᵗ` of its plane `p = (a, b, c, d)`
//! to each of its vertices. Evaluating a vertex quadric at a position gives
//! the sum of squared distances from that position to the accumulated planes.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};
use proxymesh_core::{Point3d, Vector3d};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::snapshot::MeshSnapshot;

/// Plane `a·x + b·y + c·z + d = 0` with a unit normal, or the zero plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3d,
    pub offset: f64,
}

impl Plane {
    /// The zero plane `(0, 0, 0, 0)` assigned to degenerate faces
    pub fn zero() -> Self {
        Self {
            normal: Vector3d::zeros(),
            offset: 0.0,
        }
    }

    /// Whether this is the zero plane of a degenerate face
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vector3d::zeros()
    }

    /// Homogeneous plane vector `(a, b, c, d)`
    pub fn homogeneous(&self) -> Vector4<f64> {
        Vector4::new(self.normal.x, self.normal.y, self.normal.z, self.offset)
    }

    /// Signed distance from a point to the plane
    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        self.normal.dot(&p.coords) + self.offset
    }
}

/// Fit a plane to a polygon using its first three vertices.
///
/// The normal is the normalized cross product `(p1 - p0) × (p2 - p0)`.
/// Polygons with fewer than three points, or whose cross product has a
/// length of at most `min_norm`, give the zero plane.
pub fn plane_of(points: &[Point3d], min_norm: f64) -> Plane {
    let [p0, p1, p2] = match points {
        [p0, p1, p2, ..] => [p0, p1, p2],
        _ => return Plane::zero(),
    };
    match (p1 - p0).cross(&(p2 - p0)).try_normalize(min_norm) {
        Some(normal) if normal.iter().all(|c| c.is_finite()) => Plane {
            normal,
            offset: -normal.dot(&p0.coords),
        },
        _ => Plane::zero(),
    }
}

/// Symmetric 4×4 error quadric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric(Matrix4<f64>);

impl Quadric {
    pub fn zero() -> Self {
        Quadric(Matrix4::zeros())
    }

    /// Outer product `p pᵗ` of the homogeneous plane vector
    pub fn from_plane(plane: &Plane) -> Self {
        let p = plane.homogeneous();
        Quadric(p * p.transpose())
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Quadric form at a position:
    /// `posᵗ·A·pos + 2·b·pos + c` with `A` the top-left 3×3 block,
    /// `b` the top three entries of the last column and `c` the corner entry.
    pub fn evaluate(&self, pos: &Point3d) -> f64 {
        let a = self.0.fixed_view::<3, 3>(0, 0);
        let b = self.0.fixed_view::<3, 1>(0, 3);
        let x = pos.coords;
        (x.transpose() * a * x)[0] + 2.0 * b.dot(&x) + self.0[(3, 3)]
    }

    /// Position minimizing the quadric form.
    ///
    /// Solves `A·x = -b`. Returns `None` when `|det A| <= epsilon` or the
    /// solve does not produce a finite point.
    pub fn minimizer(&self, epsilon: f64) -> Option<Point3d> {
        let a: Matrix3<f64> = self.0.fixed_view::<3, 3>(0, 0).into_owned();
        if a.determinant().abs() <= epsilon {
            return None;
        }
        let b: Vector3<f64> = self.0.fixed_view::<3, 1>(0, 3).into_owned();
        let x = a.lu().solve(&(-b))?;
        x.iter().all(|c| c.is_finite()).then(|| Point3d::from(x))
    }
}

impl Default for Quadric {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Quadric) -> Quadric {
        Quadric(self.0 + rhs.0)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Quadric) {
        self.0 += rhs.0;
    }
}

impl Sum for Quadric {
    fn sum<I: Iterator<Item = Quadric>>(iter: I) -> Quadric {
        iter.fold(Quadric::zero(), |acc, q| acc + q)
    }
}

/// Quadric contributed by a plane
pub fn quadric_of(plane: &Plane) -> Quadric {
    Quadric::from_plane(plane)
}

/// Compute every face plane and every vertex quadric of a fresh snapshot.
///
/// Each vertex quadric becomes the sum of the quadrics of its incident
/// faces, taken in ascending face order. Returns the number of degenerate
/// faces, which contribute the zero quadric.
pub fn accumulate(snapshot: &mut MeshSnapshot, min_norm: f64) -> usize {
    let mut degenerate = 0;

    for fi in 0..snapshot.faces.len() {
        if snapshot.faces[fi].removed {
            continue;
        }
        let points: Vec<Point3d> = snapshot.faces[fi]
            .vertices
            .iter()
            .take(3)
            .map(|&v| snapshot.vertices[v].position)
            .collect();
        let plane = plane_of(&points, min_norm);
        if plane.is_degenerate() {
            degenerate += 1;
        }
        snapshot.faces[fi].plane = plane;
    }

    for vi in 0..snapshot.vertices.len() {
        let q: Quadric = snapshot.vertex_faces[vi]
            .iter()
            .map(|&fi| quadric_of(&snapshot.faces[fi].plane))
            .sum();
        snapshot.vertices[vi].quadric = q;
    }

    degenerate
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_of_triangle() {
        let plane = plane_of(
            &[
                Point3d::new(0.0, 0.0, 2.0),
                Point3d::new(1.0, 0.0, 2.0),
                Point3d::new(0.0, 1.0, 2.0),
            ],
            1e-12,
        );
        assert_relative_eq!(plane.normal, Vector3d::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.offset, -2.0);
        assert_relative_eq!(plane.signed_distance(&Point3d::new(5.0, 5.0, 3.0)), 1.0);
    }

    #[test]
    fn test_plane_of_uses_first_three_vertices() {
        // The fourth vertex is off-plane and must be ignored
        let plane = plane_of(
            &[
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(0.0, 1.0, 5.0),
            ],
            1e-12,
        );
        assert_relative_eq!(plane.normal, Vector3d::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_colinear_face_gives_zero_plane() {
        let plane = plane_of(
            &[
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 1.0),
                Point3d::new(2.0, 2.0, 2.0),
            ],
            1e-12,
        );
        assert!(plane.is_degenerate());
        assert_eq!(plane.homogeneous(), Vector4::zeros());
        assert_eq!(quadric_of(&plane), Quadric::zero());
    }

    #[test]
    fn test_quadric_is_outer_product() {
        let plane = Plane {
            normal: Vector3d::new(0.0, 0.6, 0.8),
            offset: -1.5,
        };
        let q = quadric_of(&plane);
        let m = q.matrix();
        assert_relative_eq!(m[(1, 2)], 0.6 * 0.8);
        assert_relative_eq!(m[(2, 3)], 0.8 * -1.5);
        assert_relative_eq!(m[(3, 3)], 2.25);
        assert_eq!(m, &m.transpose());
    }

    #[test]
    fn test_evaluate_is_squared_distance() {
        let plane = Plane {
            normal: Vector3d::new(1.0, 0.0, 0.0),
            offset: -1.0,
        };
        let q = quadric_of(&plane);
        assert_relative_eq!(q.evaluate(&Point3d::new(4.0, 7.0, -2.0)), 9.0);
        assert_relative_eq!(q.evaluate(&Point3d::new(1.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_minimizer_of_three_planes_is_their_intersection() {
        let q = quadric_of(&Plane { normal: Vector3d::x(), offset: -1.0 })
            + quadric_of(&Plane { normal: Vector3d::y(), offset: -2.0 })
            + quadric_of(&Plane { normal: Vector3d::z(), offset: 3.0 });
        let p = q.minimizer(1e-10).unwrap();
        assert_relative_eq!(p, Point3d::new(1.0, 2.0, -3.0), epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(&p), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minimizer_singular_for_single_plane() {
        let q = quadric_of(&Plane { normal: Vector3d::z(), offset: 0.0 });
        assert!(q.minimizer(1e-10).is_none());
        assert!(Quadric::zero().minimizer(1e-10).is_none());
    }

    #[test]
    fn test_addition_is_elementwise() {
        let a = quadric_of(&Plane { normal: Vector3d::x(), offset: 0.25 });
        let b = quadric_of(&Plane { normal: Vector3d::new(0.0, 0.6, 0.8), offset: -1.0 });
        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(c.matrix()[(i, j)], a.matrix()[(i, j)] + b.matrix()[(i, j)]);
            }
        }
    }
}
