//! Indexed triangle mesh, the input of the scene.
//!
//! The mesh is immutable once built and gets shared between all the triangle leaves
//! of a scene, each leaf only stores its face index.

use index_vec::IndexVec;
use thiserror::Error;

use crate::geometry::{FloatType, Triangle, WorldPoint, WorldVector};

index_vec::define_index_type! {
    pub struct VertexIdx = usize;
}

index_vec::define_index_type! {
    pub struct FaceIdx = usize;
}

/// Accumulated normals shorter than this are considered zero and left unnormalized.
const MIN_NORMAL_LENGTH: FloatType = 1e-10;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: IndexVec<VertexIdx, WorldPoint>,
    faces: IndexVec<FaceIdx, Triangle<VertexIdx>>,
    normals: IndexVec<VertexIdx, WorldVector>,
}

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("Face {face} references vertex {vertex}, but the mesh only has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("Got {normal_count} vertex normals for {vertex_count} vertices")]
    NormalCountMismatch {
        normal_count: usize,
        vertex_count: usize,
    },
}

impl Mesh {
    /// Creates a mesh from vertex positions and 0-based vertex indices of faces,
    /// computing smooth per-vertex normals.
    pub fn new(vertices: Vec<WorldPoint>, faces: Vec<[usize; 3]>) -> Result<Mesh, MeshError> {
        let vertices: IndexVec<VertexIdx, WorldPoint> = vertices.into();
        let faces = convert_faces(faces, vertices.len())?;
        let normals = per_vertex_normals(&vertices, &faces);

        Ok(Mesh {
            vertices,
            faces,
            normals,
        })
    }

    /// Creates a mesh with externally supplied vertex normals.
    pub fn with_normals(
        vertices: Vec<WorldPoint>,
        faces: Vec<[usize; 3]>,
        normals: Vec<WorldVector>,
    ) -> Result<Mesh, MeshError> {
        if normals.len() != vertices.len() {
            return Err(MeshError::NormalCountMismatch {
                normal_count: normals.len(),
                vertex_count: vertices.len(),
            });
        }

        let faces = convert_faces(faces, vertices.len())?;

        Ok(Mesh {
            vertices: vertices.into(),
            faces,
            normals: normals.into(),
        })
    }

    pub fn vertices(&self) -> &IndexVec<VertexIdx, WorldPoint> {
        &self.vertices
    }

    pub fn faces(&self) -> &IndexVec<FaceIdx, Triangle<VertexIdx>> {
        &self.faces
    }

    pub fn normals(&self) -> &IndexVec<VertexIdx, WorldVector> {
        &self.normals
    }

    /// Corner positions of a face.
    pub fn triangle(&self, face: FaceIdx) -> Triangle<WorldPoint> {
        self.faces[face].map(|i| self.vertices[*i])
    }

    /// Vertex normals at the corners of a face.
    pub fn triangle_normals(&self, face: FaceIdx) -> Triangle<WorldVector> {
        self.faces[face].map(|i| self.normals[*i])
    }
}

fn convert_faces(
    faces: Vec<[usize; 3]>,
    vertex_count: usize,
) -> Result<IndexVec<FaceIdx, Triangle<VertexIdx>>, MeshError> {
    faces
        .into_iter()
        .enumerate()
        .map(|(face, indices)| {
            if let Some(&vertex) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::VertexIndexOutOfRange {
                    face,
                    vertex,
                    vertex_count,
                });
            }
            let [a, b, c] = indices.map(VertexIdx::from_usize);
            Ok(Triangle::new(a, b, c))
        })
        .collect()
}

/// Smooth normals: every vertex gets the normalized sum of area weighted normals
/// of the faces around it.
/// Vertices with no faces (or only degenerate ones) keep a zero normal.
pub fn per_vertex_normals(
    vertices: &IndexVec<VertexIdx, WorldPoint>,
    faces: &IndexVec<FaceIdx, Triangle<VertexIdx>>,
) -> IndexVec<VertexIdx, WorldVector> {
    let mut normals: IndexVec<VertexIdx, WorldVector> =
        index_vec::index_vec![WorldVector::zeros(); vertices.len()];

    for face in faces.iter() {
        let area_normal = face.map(|i| vertices[*i]).normal();
        for i in face.iter() {
            normals[*i] += area_normal;
        }
    }

    for normal in normals.iter_mut() {
        if normal.norm() > MIN_NORMAL_LENGTH {
            normal.normalize_mut();
        }
    }

    normals
}
