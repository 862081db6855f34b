use log::debug;
use thiserror::Error;

use crate::geometry::WorldBox;

use super::{AabbTree, Intersectable};

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Can't build a tree without any objects")]
    Empty,
}

impl AabbTree {
    /// Builds a tree over the objects, in the order given.
    pub fn new(objects: Vec<Intersectable>) -> Result<AabbTree, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::Empty);
        }
        Ok(Self::build(objects, 0))
    }

    fn build(objects: Vec<Intersectable>, depth: usize) -> AabbTree {
        let bounding_box = union_box(&objects);
        let num_leaves = objects.len();

        match <[Intersectable; 1]>::try_from(objects) {
            Ok([object]) => AabbTree {
                left: object,
                right: None,
                depth,
                num_leaves,
                bounding_box,
            },
            Err(objects) => {
                let (left_objects, right_objects) = split_objects(objects, &bounding_box);
                AabbTree {
                    left: Self::build(left_objects, depth + 1).into(),
                    right: Some(Self::build(right_objects, depth + 1).into()),
                    depth,
                    num_leaves,
                    bounding_box,
                }
            }
        }
    }
}

fn union_box(objects: &[Intersectable]) -> WorldBox {
    let mut ret = WorldBox::empty();
    for object in objects {
        ret.insert_box(object.bounding_box());
    }
    ret
}

/// Splits at least two objects into two nonempty groups, each smaller than the input.
///
/// Objects with box center at or below the midpoint of the longest axis go left, the rest goes right.
/// If that leaves one side empty, the input order is cut in half instead.
fn split_objects(
    objects: Vec<Intersectable>,
    enclosing_box: &WorldBox,
) -> (Vec<Intersectable>, Vec<Intersectable>) {
    assert2::assert!(objects.len() >= 2);

    let axis = enclosing_box.longest_axis();
    let midpoint = enclosing_box.axis_center(axis);

    let (left, right): (Vec<_>, Vec<_>) = objects
        .into_iter()
        .partition(|object| object.bounding_box().axis_center(axis) <= midpoint);

    if !left.is_empty() && !right.is_empty() {
        return (left, right);
    }

    debug!(
        "Midpoint split of {} objects along axis {axis} is degenerate, splitting by order",
        left.len() + right.len()
    );

    // One of the sides holds all objects, still in the input order
    let mut left = if left.is_empty() { right } else { left };
    let right = left.split_off(left.len() / 2);
    (left, right)
}
