use serde::Deserialize;

/// Declarative block catalog, typically loaded from TOML. Baking turns this
/// into a `BakedLibrary` (see `bake`).
#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// Indexed material keys; a material's position here is its output
    /// surface index.
    pub materials: Vec<String>,
    #[serde(default)]
    pub fluids: Vec<FluidDef>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Debug, Deserialize)]
pub struct FluidDef {
    pub name: String,
    pub material: String,
    #[serde(default = "default_max_level")]
    pub max_level: u8,
    #[serde(default)]
    pub dip_when_flowing_down: bool,
}

/// One voxel id. Ids are assigned in declaration order starting at 1;
/// id 0 stays reserved for air.
#[derive(Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    /// Material key for cube blocks. Fluid blocks take their fluid's material.
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub transparency_index: Option<u8>,
    #[serde(default)]
    pub culls_neighbors: Option<bool>,
    #[serde(default)]
    pub contributes_to_ao: Option<bool>,
    #[serde(default)]
    pub collision: Option<bool>,
    /// Name of a fluid declared in `fluids`; makes this block a fluid voxel.
    #[serde(default)]
    pub fluid: Option<String>,
    /// Fluid level in `0..=max_level`; defaults to `max_level`.
    #[serde(default)]
    pub fluid_level: Option<u8>,
}

fn default_max_level() -> u8 {
    8
}
