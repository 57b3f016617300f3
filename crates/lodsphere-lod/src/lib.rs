//! Viewer-driven quadtree level of detail for a cube-sphere planet.
//!
//! A [`Planet`] owns six [`TerrainFace`]s. Each face owns a quadtree of
//! [`Chunk`]s that splits toward the viewer according to a per-depth
//! [`LodDistances`] table, drops leaves past the horizon, and merges the
//! remaining leaf meshes into one [`lodsphere_mesh::FaceMesh`].

mod chunk;
mod context;
mod error;
mod face;
mod horizon_culling;
mod lod_table;
mod planet;

pub use chunk::Chunk;
pub use context::LodContext;
pub use error::LodError;
pub use face::{FaceUpdate, RebuildPolicy, TerrainFace, VisibleSignature};
pub use horizon_culling::{DEFAULT_CULLING_MIN_ANGLE, HorizonCuller};
pub use lod_table::LodDistances;
pub use planet::{MAX_RESOLUTION, PassStats, Planet, PlanetSettings};
