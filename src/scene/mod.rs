//! Ray queries against a triangle mesh.
//!
//! [`Scene`] owns a mesh, one [`MeshTriangle`] leaf per face and an [`AabbTree`] built over
//! the leaves. Loading a new mesh builds everything from scratch and swaps it in at once.

mod aabb_tree;
mod mesh_triangle;

use std::sync::Arc;

use bon::bon;
use log::{info, warn};

use crate::{
    geometry::{FloatType, Ray, WorldBox, WorldPoint, WorldVector},
    mesh::{Mesh, MeshError},
};

pub use aabb_tree::{AabbTree, BuildError, Intersectable, RayHit, TreeStatistics};
pub use mesh_triangle::{MeshTriangle, Shading};

/// Object that can be hit by a ray, without an upper limit on the distance.
pub trait Object {
    fn bounding_box(&self) -> &WorldBox;
    /// Closest hit with t >= min_t.
    fn intersect(&self, ray: &Ray, min_t: FloatType) -> Option<HitRecord>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub t: FloatType,
    pub normal: WorldVector,
}

/// Checks every object, returning the index of the closest one that was hit.
/// The first object wins when several are hit at the same distance.
pub fn first_hit<O: Object>(
    ray: &Ray,
    min_t: FloatType,
    objects: &[O],
) -> Option<(usize, HitRecord)> {
    let mut best: Option<(usize, HitRecord)> = None;
    for (i, object) in objects.iter().enumerate() {
        let Some(hit) = object.intersect(ray, min_t) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, b)| hit.t < b.t) {
            best = Some((i, hit));
        }
    }
    best
}

#[derive(Clone, Debug)]
pub struct SceneHit<'a> {
    pub t: FloatType,
    pub normal: WorldVector,
    pub object: &'a MeshTriangle,
}

impl SceneHit<'_> {
    pub fn point(&self, ray: &Ray) -> WorldPoint {
        ray.point_at(self.t)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    shading: Shading,
    mesh: Arc<Mesh>,
    leaves: Vec<MeshTriangle>,
    /// None if the mesh has no faces.
    bvh: Option<AabbTree>,
}

#[bon]
impl Scene {
    #[builder]
    pub fn new(#[builder(default)] shading: Shading) -> Scene {
        Scene {
            shading,
            ..Default::default()
        }
    }

    /// Validates and loads a mesh given as vertex positions and 0-based face indices.
    /// On error the previously loaded mesh stays in place.
    pub fn load_mesh(
        &mut self,
        vertices: Vec<WorldPoint>,
        faces: Vec<[usize; 3]>,
    ) -> Result<(), MeshError> {
        let mesh = Mesh::new(vertices, faces)?;
        self.load(mesh);
        Ok(())
    }

    /// Replaces the scene content with the mesh.
    pub fn load(&mut self, mesh: Mesh) {
        let mesh = Arc::new(mesh);
        let leaves: Vec<_> = mesh
            .faces()
            .indices()
            .map(|face| MeshTriangle::new(Arc::clone(&mesh), face, self.shading))
            .collect();

        let bvh = match AabbTree::new(leaves.iter().cloned().map(Intersectable::from).collect()) {
            Ok(tree) => {
                info!(
                    "Loaded mesh with {} vertices: {}",
                    mesh.vertices().len(),
                    tree.statistics()
                );
                Some(tree)
            }
            Err(BuildError::Empty) => {
                warn!("Loaded mesh has no faces, all rays will miss");
                None
            }
        };

        *self = Scene {
            shading: self.shading,
            mesh,
            leaves,
            bvh,
        };
    }

    /// Closest hit within [min_t, max_t], with the normal at the hit point.
    pub fn intersect(&self, ray: &Ray, min_t: FloatType, max_t: FloatType) -> Option<SceneHit<'_>> {
        let hit = self.bvh.as_ref()?.ray_intersect(ray, min_t, max_t)?;
        // Anything other than a triangle would be a tree nested in a leaf, which never gets built here
        let object = hit.descendant.as_triangle()?;
        Some(SceneHit {
            t: hit.t,
            normal: object.normal_at(&ray.point_at(hit.t)),
            object,
        })
    }

    /// Same as [`Scene::intersect`] with unbounded max_t, but checks every face.
    /// Slow, intended for diagnostics.
    pub fn intersect_brute_force(&self, ray: &Ray, min_t: FloatType) -> Option<SceneHit<'_>> {
        let (i, record) = first_hit(ray, min_t, &self.leaves)?;
        Some(SceneHit {
            t: record.t,
            normal: record.normal,
            object: &self.leaves[i],
        })
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn bvh(&self) -> Option<&AabbTree> {
        self.bvh.as_ref()
    }

    pub fn statistics(&self) -> Option<TreeStatistics> {
        self.bvh.as_ref().map(AabbTree::statistics)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::{
        geometry::{Triangle, test::world_triangle},
        mesh::test::pyramid,
    };

    use assert2::{assert, let_assert};
    use test_strategy::proptest;

    /// Flat shaded leaves of a mesh that has three vertices of its own for every triangle
    pub fn leaves_from_triangles(triangles: &[Triangle<WorldPoint>]) -> Vec<MeshTriangle> {
        let vertices = triangles.iter().flat_map(|t| t.iter().copied()).collect();
        let faces = (0..triangles.len())
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        let mesh = Arc::new(Mesh::new(vertices, faces).unwrap());
        mesh.faces()
            .indices()
            .map(|face| MeshTriangle::new(Arc::clone(&mesh), face, Shading::Flat))
            .collect()
    }

    fn unit_triangle_scene() -> Scene {
        let mut scene = Scene::default();
        scene
            .load_mesh(
                vec![
                    WorldPoint::new(-1.0, -1.0, 0.0),
                    WorldPoint::new(1.0, -1.0, 0.0),
                    WorldPoint::new(0.0, 1.0, 0.0),
                ],
                vec![[0, 1, 2]],
            )
            .unwrap();
        scene
    }

    fn down_the_z_axis() -> Ray {
        Ray::new(
            WorldPoint::new(0.0, 0.0, 5.0),
            WorldVector::new(0.0, 0.0, -1.0),
        )
    }

    #[test]
    fn unit_triangle_hit() {
        let scene = unit_triangle_scene();
        let_assert!(Some(hit) = scene.intersect(&down_the_z_axis(), 0.01, FloatType::INFINITY));
        assert!((hit.t - 5.0).abs() < 1e-12);
        assert!((hit.normal - WorldVector::z()).norm() < 1e-12);
        assert!(hit.object.face().index() == 0);
        assert!((hit.point(&down_the_z_axis()) - WorldPoint::origin()).norm() < 1e-12);
    }

    #[test]
    fn parallel_ray_misses() {
        let scene = unit_triangle_scene();
        let ray = Ray::new(
            WorldPoint::new(0.0, 0.0, 5.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        assert!(scene.intersect(&ray, 0.01, FloatType::INFINITY).is_none());
    }

    #[test]
    fn builder_defaults() {
        let scene = Scene::builder().build();
        assert!(scene.shading() == Shading::Flat);
        assert!(scene.bvh().is_none());
        assert!(scene.mesh().faces().is_empty());

        let smooth = Scene::builder().shading(Shading::Smooth).build();
        assert!(smooth.shading() == Shading::Smooth);
    }

    #[test]
    fn empty_scene_misses() {
        let mut scene = Scene::default();
        assert!(scene.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY).is_none());

        scene.load_mesh(vec![WorldPoint::origin()], Vec::new()).unwrap();
        assert!(scene.bvh().is_none());
        assert!(scene.statistics().is_none());
        assert!(scene.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY).is_none());
        assert!(scene.intersect_brute_force(&down_the_z_axis(), 0.0).is_none());
    }

    #[test]
    fn reload_replaces_content() {
        let mut scene = unit_triangle_scene();
        scene
            .load_mesh(
                vec![
                    WorldPoint::new(10.0, 10.0, 0.0),
                    WorldPoint::new(11.0, 10.0, 0.0),
                    WorldPoint::new(10.0, 11.0, 0.0),
                ],
                vec![[0, 1, 2]],
            )
            .unwrap();
        assert!(scene.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY).is_none());
        assert!(scene.mesh().vertices().len() == 3);
    }

    #[test]
    fn failed_load_keeps_previous_mesh() {
        let mut scene = unit_triangle_scene();
        let_assert!(
            Err(MeshError::VertexIndexOutOfRange { vertex: 7, .. }) =
                scene.load_mesh(vec![WorldPoint::origin()], vec![[0, 0, 7]])
        );
        assert!(scene.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY).is_some());
    }

    #[test]
    fn smooth_scene_interpolates_normals() {
        let mut scene = Scene::builder().shading(Shading::Smooth).build();
        scene.load(pyramid());

        let_assert!(Some(hit) = scene.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY));
        assert!((hit.t - 4.0).abs() < 1e-12);
        // Apex vertex normal
        assert!((hit.normal - WorldVector::z()).norm() < 1e-9);

        let mut flat = Scene::default();
        flat.load(pyramid());
        let_assert!(Some(flat_hit) = flat.intersect(&down_the_z_axis(), 0.0, FloatType::INFINITY));
        assert!(flat_hit.normal.z < 0.8);
    }

    #[test]
    fn statistics_of_loaded_scene() {
        let mut scene = Scene::default();
        scene.load(pyramid());
        let_assert!(Some(s) = scene.statistics());
        assert!(s.leaf_count == 4);
        assert!(s.internal_node_count == 3);
    }

    #[test]
    fn scene_is_shareable_between_threads() {
        fn check<T: Send + Sync>() {}
        check::<Scene>();
        check::<AabbTree>();
    }

    #[test]
    fn first_hit_prefers_first_on_tie() {
        let leaves = leaves_from_triangles(&[
            Triangle::new(
                WorldPoint::new(-1.0, -1.0, 0.0),
                WorldPoint::new(1.0, -1.0, 0.0),
                WorldPoint::new(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                WorldPoint::new(-1.0, -1.0, 0.0),
                WorldPoint::new(1.0, -1.0, 0.0),
                WorldPoint::new(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                WorldPoint::new(-1.0, -1.0, 2.0),
                WorldPoint::new(1.0, -1.0, 2.0),
                WorldPoint::new(0.0, 1.0, 2.0),
            ),
        ]);
        let_assert!(Some((i, record)) = first_hit(&down_the_z_axis(), 0.0, &leaves));
        assert!(i == 2);
        assert!(record.t == 3.0);

        let_assert!(Some((i, record)) = first_hit(&down_the_z_axis(), 3.5, &leaves));
        assert!(i == 0);
        assert!(record.t == 5.0);

        assert!(first_hit(&down_the_z_axis(), 5.5, &leaves).is_none());
    }

    /// Tree query and brute force agree on the closest hit
    #[proptest]
    fn tree_matches_brute_force(
        #[strategy(proptest::collection::vec(world_triangle(), 1..30))] triangles: Vec<
            Triangle<WorldPoint>,
        >,
        ray: crate::geometry::test::RayWrapper,
    ) {
        let vertices = triangles.iter().flat_map(|t| t.iter().copied()).collect();
        let faces = (0..triangles.len())
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        let mut scene = Scene::default();
        scene.load_mesh(vertices, faces).unwrap();

        let tree_hit = scene.intersect(&ray, 0.0, FloatType::INFINITY);
        let brute_hit = scene.intersect_brute_force(&ray, 0.0);

        assert!(tree_hit.as_ref().map(|h| h.t) == brute_hit.as_ref().map(|h| h.t));
        assert!(
            tree_hit.map(|h| h.object.face()) == brute_hit.map(|h| h.object.face())
        );
    }
}
