//! CPU blocky mesher: culled-face extraction, procedural fluid surfaces, and
//! LOD seam stitching over padded voxel buffers.
#![forbid(unsafe_code)]

mod arrays;
mod build;
mod constants;
mod cube;
mod emit;
mod fluid;
mod mesh;
mod neighbors;
mod occlusion;
mod seams;

pub use arrays::{Arrays, CollisionSurface};
pub use build::{
    BlockyMesher, MeshError, MesherInput, MesherOutput, OutputSurface, PrimitiveType,
};
pub use constants::PADDING;
