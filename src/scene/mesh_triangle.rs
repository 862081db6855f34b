use std::sync::Arc;

use crate::{
    geometry::{
        FloatType, Ray, Triangle, TriangleHit, WorldBox, WorldPoint, WorldVector,
        ray_intersect_triangle,
    },
    mesh::{FaceIdx, Mesh},
};

use super::{HitRecord, Object};

/// How normals are reported at a hit point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    /// Geometric normal of the hit face.
    #[default]
    Flat,
    /// Vertex normals interpolated over the face.
    Smooth,
}

/// Single face of a shared mesh.
/// Doesn't own any geometry, only keeps the mesh alive.
#[derive(Clone, Debug)]
pub struct MeshTriangle {
    mesh: Arc<Mesh>,
    face: FaceIdx,
    shading: Shading,
    bounding_box: WorldBox,
}

impl MeshTriangle {
    /// Panics if the face index is out of range of the mesh.
    pub fn new(mesh: Arc<Mesh>, face: FaceIdx, shading: Shading) -> MeshTriangle {
        assert2::assert!(face.index() < mesh.faces().len());
        let bounding_box = mesh.triangle(face).bounding_box();
        MeshTriangle {
            mesh,
            face,
            shading,
            bounding_box,
        }
    }

    pub fn face(&self) -> FaceIdx {
        self.face
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn triangle(&self) -> Triangle<WorldPoint> {
        self.mesh.triangle(self.face)
    }

    /// Intersection with the ray within the window [min_t, max_t].
    pub fn ray_intersect(
        &self,
        ray: &Ray,
        min_t: FloatType,
        max_t: FloatType,
    ) -> Option<TriangleHit> {
        ray_intersect_triangle(ray, &self.triangle(), min_t, max_t)
    }

    /// Unit geometric normal, zero for degenerate faces.
    pub fn face_normal(&self) -> WorldVector {
        self.triangle().face_normal().unwrap_or_else(WorldVector::zeros)
    }

    /// Normal at a point of the face, according to the shading mode.
    pub fn normal_at(&self, p: &WorldPoint) -> WorldVector {
        match self.shading {
            Shading::Flat => self.face_normal(),
            Shading::Smooth => self
                .smooth_normal_at(p)
                .unwrap_or_else(|| self.face_normal()),
        }
    }

    fn smooth_normal_at(&self, p: &WorldPoint) -> Option<WorldVector> {
        let uv = self.triangle().barycentric_coordinates(p)?;
        let normals = self.mesh.triangle_normals(self.face);
        uv.interpolate_triangle(&normals).try_normalize(1e-10)
    }
}

impl Object for MeshTriangle {
    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    fn intersect(&self, ray: &Ray, min_t: FloatType) -> Option<HitRecord> {
        let hit = self.ray_intersect(ray, min_t, FloatType::INFINITY)?;
        Some(HitRecord {
            t: hit.t,
            normal: self.normal_at(&ray.point_at(hit.t)),
        })
    }
}
