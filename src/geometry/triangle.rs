use std::ops::{Add, Index, Mul, Sub};

use nalgebra::{
    ClosedAddAssign, ClosedDivAssign, DefaultAllocator, DimName, OPoint, OVector, Scalar,
    allocator::Allocator,
};
use num_traits::{One, Zero};

use super::{FloatType, WorldBox, WorldPoint, WorldVector};

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    T: ClosedAddAssign + ClosedDivAssign + Zero + From<u16>,
{
    pub fn centroid(&self) -> OPoint<T, D> {
        OPoint {
            coords: self.0.iter().map(|p| &p.coords).sum::<OVector<T, D>>()
                / T::from(self.0.len() as u16),
        }
    }
}

impl Triangle<WorldPoint> {
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self[1] - self[0], self[2] - self[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    /// Its length is twice the area of the triangle, direction follows the
    /// right hand rule over the vertex order.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    /// Unit normal of the triangle, `None` if the triangle is degenerate.
    pub fn face_normal(&self) -> Option<WorldVector> {
        self.normal().try_normalize(0.0)
    }

    pub fn bounding_box(&self) -> WorldBox {
        let mut ret = WorldBox::from(&self[0]);
        ret.insert_point(&self[1]);
        ret.insert_point(&self[2]);
        ret
    }

    /// Barycentric coordinates of the projection of `p` onto the triangle's plane.
    /// `u` is the weight of self[1], `v` of self[2].
    /// Returns `None` for degenerate triangles.
    pub fn barycentric_coordinates(
        &self,
        p: &WorldPoint,
    ) -> Option<BarycentricCoordinates<FloatType>> {
        let [e1, e2] = self.edges();
        let to_p = p - self[0];

        let d11 = e1.dot(&e1);
        let d12 = e1.dot(&e2);
        let d22 = e2.dot(&e2);
        let dp1 = to_p.dot(&e1);
        let dp2 = to_p.dot(&e2);

        let denominator = d11 * d22 - d12 * d12;
        if denominator.abs() <= 1e-12 * d11 * d22 {
            return None;
        }

        Some(BarycentricCoordinates {
            u: (d22 * dp1 - d12 * dp2) / denominator,
            v: (d11 * dp2 - d12 * dp1) / denominator,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates<T> {
    pub u: T,
    pub v: T,
}

impl<T> BarycentricCoordinates<T>
where
    T: One + Copy + Sub<Output = T>,
{
    pub fn interpolate<T2>(&self, a: &T2, b: &T2, c: &T2) -> T2
    where
        for<'a> &'a T2: Mul<T, Output = T2>,
        T2: Add<Output = T2>,
    {
        let w = T::one() - self.u - self.v;
        a * w + b * self.u + c * self.v
    }

    pub fn interpolate_triangle<T2>(&self, triangle: &Triangle<T2>) -> T2
    where
        for<'a> &'a T2: Mul<T, Output = T2>,
        T2: Add<Output = T2>,
    {
        self.interpolate(&triangle[0], &triangle[1], &triangle[2])
    }
}
