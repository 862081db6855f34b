use super::{FloatType, PARALLEL_EPSILON, Ray, WorldBox};

/// Calculates the range of distances along the ray that lie inside the box (slab test).
/// Returns `None` if the ray misses the box completely.
///
/// Axes where the ray direction is (almost) zero don't limit the range, they only reject
/// rays whose origin lies outside of the slab.
/// The returned range is not clipped to positive distances.
pub fn ray_box_window(ray: &Ray, b: &WorldBox) -> Option<(FloatType, FloatType)> {
    let mut t_min = FloatType::NEG_INFINITY;
    let mut t_max = FloatType::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let slab_min = b.min[axis];
        let slab_max = b.max[axis];

        if direction.abs() < PARALLEL_EPSILON {
            if origin < slab_min || origin > slab_max {
                return None;
            }
        } else {
            let t1 = (slab_min - origin) / direction;
            let t2 = (slab_max - origin) / direction;
            let (t1, t2) = if t1 > t2 { (t2, t1) } else { (t1, t2) };

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }
    }

    Some((t_min, t_max))
}

/// Checks whether the part of the ray inside the box overlaps the window [min_t, max_t].
///
/// This only tests overlap of the two ranges, a `true` result doesn't mean that
/// the point where the ray enters the box is within the window.
pub fn ray_intersect_box(ray: &Ray, b: &WorldBox, min_t: FloatType, max_t: FloatType) -> bool {
    ray_box_window(ray, b).is_some_and(|(t_min, t_max)| t_max >= min_t && t_min <= max_t)
}
