mod building;
mod printing;
mod ray_tree_intersection;

use crate::geometry::{FloatType, Ray, WorldBox, WorldPoint};

use super::{HitRecord, MeshTriangle, Object};

pub use building::BuildError;
pub use printing::TreeStatistics;

/// Anything that can be stored in the tree: a triangle leaf, or a whole subtree.
#[derive(Clone, Debug)]
pub enum Intersectable {
    Triangle(MeshTriangle),
    Tree(Box<AabbTree>),
}

/// Result of a windowed ray query.
#[derive(Copy, Clone, Debug)]
pub struct RayHit<'a> {
    pub t: FloatType,
    /// The leaf object that was actually hit.
    pub descendant: &'a Intersectable,
}

/// Binary tree of axis aligned bounding boxes.
///
/// Every node exclusively owns its children. A node without a right child is a leaf wrapper
/// holding exactly one object in `left`. The tree is immutable once built.
#[derive(Clone, Debug)]
pub struct AabbTree {
    left: Intersectable,
    right: Option<Intersectable>,
    /// Depth of this node, root has depth 0.
    depth: usize,
    /// Number of objects in this subtree. Only used for diagnostics.
    num_leaves: usize,
    bounding_box: WorldBox,
}

impl AabbTree {
    pub fn left(&self) -> &Intersectable {
        &self.left
    }

    pub fn right(&self) -> Option<&Intersectable> {
        self.right.as_ref()
    }

    pub fn is_leaf_wrapper(&self) -> bool {
        self.right.is_none()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    /// Nearest point queries need a different traversal order than this tree provides,
    /// a depth first search would visit nearly every node.
    /// Calling this is a bug, it always panics.
    pub fn point_squared_distance(
        &self,
        _query: &WorldPoint,
        _min_sqrd: FloatType,
        _max_sqrd: FloatType,
    ) -> Option<(FloatType, &Intersectable)> {
        panic!("Point distance queries are not supported by AabbTree, use a structure built for them")
    }
}

impl Intersectable {
    pub fn bounding_box(&self) -> &WorldBox {
        match self {
            Intersectable::Triangle(triangle) => Object::bounding_box(triangle),
            Intersectable::Tree(tree) => tree.bounding_box(),
        }
    }

    /// First hit with distance within [min_t, max_t].
    /// Triangles report themselves as the descendant, trees report the leaf that was hit.
    pub fn ray_intersect(&self, ray: &Ray, min_t: FloatType, max_t: FloatType) -> Option<RayHit<'_>> {
        match self {
            Intersectable::Triangle(triangle) => {
                let hit = triangle.ray_intersect(ray, min_t, max_t)?;
                Some(RayHit {
                    t: hit.t,
                    descendant: self,
                })
            }
            Intersectable::Tree(tree) => tree.ray_intersect(ray, min_t, max_t),
        }
    }

    pub fn as_triangle(&self) -> Option<&MeshTriangle> {
        match self {
            Intersectable::Triangle(triangle) => Some(triangle),
            Intersectable::Tree(_) => None,
        }
    }
}

impl From<MeshTriangle> for Intersectable {
    fn from(triangle: MeshTriangle) -> Self {
        Intersectable::Triangle(triangle)
    }
}

impl From<AabbTree> for Intersectable {
    fn from(tree: AabbTree) -> Self {
        Intersectable::Tree(Box::new(tree))
    }
}

impl Object for Intersectable {
    fn bounding_box(&self) -> &WorldBox {
        Intersectable::bounding_box(self)
    }

    fn intersect(&self, ray: &Ray, min_t: FloatType) -> Option<HitRecord> {
        match self {
            Intersectable::Triangle(triangle) => triangle.intersect(ray, min_t),
            Intersectable::Tree(tree) => tree.intersect(ray, min_t),
        }
    }
}

impl Object for AabbTree {
    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    /// Runs the windowed query, then asks the leaf that was hit for the normal.
    fn intersect(&self, ray: &Ray, min_t: FloatType) -> Option<HitRecord> {
        let hit = self.ray_intersect(ray, min_t, FloatType::INFINITY)?;
        let triangle = hit.descendant.as_triangle()?;
        Some(HitRecord {
            t: hit.t,
            normal: triangle.normal_at(&ray.point_at(hit.t)),
        })
    }
}
