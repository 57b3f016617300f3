//! Cube-sphere geometry: cube faces and their bases, cube-to-sphere projection, and chunk keys.

mod chunk_key;
mod cube_face;
mod projection;

pub use chunk_key::ChunkKey;
pub use cube_face::{CubeFace, FaceBasis};
pub use projection::{cube_to_sphere, cube_to_unit_sphere};
