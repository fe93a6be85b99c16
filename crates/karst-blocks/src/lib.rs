//! Block library crate: baked models, fluids, and the library the mesher reads.
#![forbid(unsafe_code)]

pub mod bake;
pub mod config;
pub mod fluid;
pub mod library;
pub mod model;

pub use bake::{bake_library, bake_library_from_toml, BakeError};
pub use config::{BlockDef, FluidDef, LibraryConfig};
pub use fluid::{BakedFluid, FlowState, FluidSurface};
pub use library::{BakedLibrary, Library, SIDE_PATTERN_EMPTY, SIDE_PATTERN_FULL};
pub use model::{
    BakedModel, Side, SideSurface, SideSurfaces, Surface, AIR_ID, MAX_SURFACES, NULL_FLUID_INDEX,
    SIDE_COUNT,
};
