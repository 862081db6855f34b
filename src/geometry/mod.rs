mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::AABB;
pub use ray_box_intersection::{ray_box_window, ray_intersect_box};
pub use ray_triangle_intersection::{TriangleHit, ray_intersect_triangle};
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f64;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// Direction components smaller than this are treated as parallel to the slab
/// in the ray-box test.
pub const PARALLEL_EPSILON: FloatType = 1e-8;

/// Systems with determinant smaller than this are treated as degenerate
/// in the ray-triangle test.
pub const DETERMINANT_EPSILON: FloatType = 1e-8;

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not necessarily normalized.
    /// Distances along the ray are measured in multiples of this vector.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }
}
