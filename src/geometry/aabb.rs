use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Point3, Scalar};
use num_traits::{Float, One};

use super::{FloatType, WorldBox, WorldPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl<T: Scalar + Float> AABB<Point3<T>> {
    /// Box that contains nothing, min corner at +infinity, max corner at -infinity.
    /// Inserting anything into it yields exactly the inserted thing's box.
    pub fn empty() -> Self {
        AABB {
            min: Point3::new(T::infinity(), T::infinity(), T::infinity()),
            max: Point3::new(T::neg_infinity(), T::neg_infinity(), T::neg_infinity()),
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn insert_point(&mut self, p: &Point3<T>) {
        for i in 0..3 {
            if p[i] < self.min[i] {
                self.min[i] = p[i];
            }
            if p[i] > self.max[i] {
                self.max[i] = p[i];
            }
        }
    }

    /// Grows this box so that it contains `other` as well.
    pub fn insert_box(&mut self, other: &Self) {
        self.insert_point(&other.min);
        self.insert_point(&other.max);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut ret = self.clone();
        ret.insert_box(other);
        ret
    }

    /// Smallest box containing all the points, `None` if the iterator is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<T>>) -> Option<Self>
    where
        T: 'a,
    {
        let mut ret = Self::empty();
        let mut any = false;
        for p in points {
            ret.insert_point(p);
            any = true;
        }
        any.then_some(ret)
    }

    pub fn contains_box(&self, other: &Self) -> bool {
        (0..3).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }
}

impl WorldBox {
    /// Index of the axis with the largest extent, the first one wins on ties.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        let mut axis = 0;
        for i in 1..3 {
            if size[i] > size[axis] {
                axis = i;
            }
        }
        axis
    }

    pub fn axis_center(&self, axis: usize) -> FloatType {
        (self.min[axis] + self.max[axis]) / 2.0
    }
}

impl From<&WorldPoint> for WorldBox {
    fn from(p: &WorldPoint) -> Self {
        AABB { min: *p, max: *p }
    }
}
