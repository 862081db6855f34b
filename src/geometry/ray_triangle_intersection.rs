use nalgebra::Matrix3;

use super::{BarycentricCoordinates, DETERMINANT_EPSILON, FloatType, Ray, Triangle, WorldPoint};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray
    pub t: FloatType,
    /// Barycentric coordinates of the hit, relative to the triangle's edges from its first corner
    pub uv: BarycentricCoordinates<FloatType>,
}

/// Calculates ray intersection with a (two sided, closed) triangle.
///
/// Solves `a + u * (b - a) + v * (c - a) = origin + t * direction` for (u, v, t).
/// Hits exactly on an edge or a corner count, so that neighboring triangles don't leave gaps.
/// Returns `None` if the ray misses, if the hit is outside of [min_t, max_t],
/// or if the system is degenerate (ray parallel to the triangle, zero area triangle).
pub fn ray_intersect_triangle(
    ray: &Ray,
    triangle: &Triangle<WorldPoint>,
    min_t: FloatType,
    max_t: FloatType,
) -> Option<TriangleHit> {
    let [e1, e2] = triangle.edges();
    let m = Matrix3::from_columns(&[e1, e2, -ray.direction]);

    if m.determinant().abs() < DETERMINANT_EPSILON {
        return None;
    }

    let solution = m.try_inverse()? * (ray.origin - triangle[0]);
    let (u, v, t) = (solution.x, solution.y, solution.z);

    if u >= 0.0 && v >= 0.0 && u + v <= 1.0 && t >= min_t && t <= max_t {
        Some(TriangleHit {
            t,
            uv: BarycentricCoordinates { u, v },
        })
    } else {
        None
    }
}
