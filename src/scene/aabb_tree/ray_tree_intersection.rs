use crate::geometry::{FloatType, Ray, ray_intersect_box};

use super::{AabbTree, RayHit};

impl AabbTree {
    /// Finds the closest hit within [min_t, max_t].
    ///
    /// Both children are probed with the same window. If they hit at the same distance,
    /// the right child wins.
    pub fn ray_intersect(&self, ray: &Ray, min_t: FloatType, max_t: FloatType) -> Option<RayHit<'_>> {
        if !ray_intersect_box(ray, &self.bounding_box, min_t, max_t) {
            return None;
        }

        let Some(right) = &self.right else {
            return self.left.ray_intersect(ray, min_t, max_t);
        };

        let left_hit = self.left.ray_intersect(ray, min_t, max_t);
        let right_hit = right.ray_intersect(ray, min_t, max_t);

        match (left_hit, right_hit) {
            (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
            (hit, None) | (None, hit) => hit,
        }
    }
}
