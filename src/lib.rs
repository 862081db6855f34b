pub mod geometry;
pub mod mesh;
pub mod scene;

pub use mesh::{Mesh, MeshError};
pub use scene::{Scene, SceneHit, Shading};
