use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use karst_geom::{Color, Vec2, Vec3};

use crate::config::{BlockDef, FluidDef, LibraryConfig};
use crate::fluid::{BakedFluid, FluidSurface};
use crate::library::{BakedLibrary, SIDE_PATTERN_EMPTY, SIDE_PATTERN_FULL};
use crate::model::{BakedModel, Side, SideSurface, Surface, SIDE_COUNT};

#[derive(Debug)]
pub enum BakeError {
    Toml(toml::de::Error),
    UnknownMaterial { block: String, key: String },
    UnknownFluid { block: String, key: String },
    MissingMaterial { block: String },
    BadMaxLevel { fluid: String, max_level: u8 },
    BadFluidLevel { block: String, level: u8, max_level: u8 },
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BakeError::Toml(e) => write!(f, "catalog parse error: {e}"),
            BakeError::UnknownMaterial { block, key } => {
                write!(f, "block {block:?} references unknown material {key:?}")
            }
            BakeError::UnknownFluid { block, key } => {
                write!(f, "block {block:?} references unknown fluid {key:?}")
            }
            BakeError::MissingMaterial { block } => {
                write!(f, "block {block:?} has neither a material nor a fluid")
            }
            BakeError::BadMaxLevel { fluid, max_level } => {
                write!(f, "fluid {fluid:?} needs max_level >= 2, got {max_level}")
            }
            BakeError::BadFluidLevel {
                block,
                level,
                max_level,
            } => write!(
                f,
                "block {block:?} has fluid_level {level} above max_level {max_level}"
            ),
        }
    }
}

impl Error for BakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BakeError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for BakeError {
    fn from(e: toml::de::Error) -> Self {
        BakeError::Toml(e)
    }
}

/// Unit-quad vertex ring for each cube side. Vertices 0 and 1 are the bottom
/// pair and 2 and 3 the top pair on lateral sides; the triangles
/// `{0,1,2, 0,2,3}` wind counter-clockwise seen from outside the cube. The
/// fluid mesher raises the top pair to per-corner heights, so this layout is
/// load-bearing.
fn side_quad_positions(side: Side) -> [Vec3; 4] {
    match side {
        Side::NegX => [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        Side::PosX => [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
        Side::NegY => [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        Side::PosY => [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
        Side::NegZ => [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ],
        Side::PosZ => [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
    }
}

const SIDE_QUAD_INDICES: [i32; 6] = [0, 1, 2, 0, 2, 3];
const SIDE_QUAD_UVS: [Vec2; 4] = [
    Vec2 { x: 0.0, y: 0.0 },
    Vec2 { x: 1.0, y: 0.0 },
    Vec2 { x: 1.0, y: 1.0 },
    Vec2 { x: 0.0, y: 1.0 },
];

fn side_quad_tangents(positions: &[Vec3; 4]) -> Vec<f32> {
    // Tangent runs along the first ring edge, handedness +1.
    let t = positions[1] - positions[0];
    let mut out = Vec::with_capacity(16);
    for _ in 0..4 {
        out.extend_from_slice(&[t.x, t.y, t.z, 1.0]);
    }
    out
}

fn bake_cube_side(side: Side) -> SideSurface {
    let positions = side_quad_positions(side);
    SideSurface {
        tangents: side_quad_tangents(&positions),
        positions: positions.to_vec(),
        uvs: SIDE_QUAD_UVS.to_vec(),
        indices: SIDE_QUAD_INDICES.to_vec(),
    }
}

fn bake_fluid_side(side: Side) -> FluidSurface {
    let positions = side_quad_positions(side);
    FluidSurface {
        tangents: side_quad_tangents(&positions),
        positions: positions.to_vec(),
        indices: SIDE_QUAD_INDICES.to_vec(),
    }
}

fn bake_fluid(def: &FluidDef, material_id: u32) -> Result<BakedFluid, BakeError> {
    if def.max_level < 2 {
        return Err(BakeError::BadMaxLevel {
            fluid: def.name.clone(),
            max_level: def.max_level,
        });
    }
    let mut side_surfaces: [FluidSurface; SIDE_COUNT] = Default::default();
    for side in Side::ALL {
        side_surfaces[side.index()] = bake_fluid_side(side);
    }
    Ok(BakedFluid {
        material_id,
        max_level: def.max_level,
        dip_when_flowing_down: def.dip_when_flowing_down,
        side_surfaces,
    })
}

fn def_color(def: &BlockDef) -> Color {
    match def.color {
        Some([r, g, b, a]) => Color::new(r, g, b, a),
        None => Color::WHITE,
    }
}

fn bake_cube_block(def: &BlockDef, material_id: u32) -> BakedModel {
    let mut model = BakedModel {
        surface_count: 1,
        side_pattern_indices: [SIDE_PATTERN_FULL; SIDE_COUNT],
        color: def_color(def),
        transparency_index: def.transparency_index.unwrap_or(0),
        culls_neighbors: def.culls_neighbors.unwrap_or(true),
        contributes_to_ao: def.contributes_to_ao.unwrap_or(true),
        empty: false,
        ..BakedModel::default()
    };
    model.surfaces[0] = Surface {
        material_id,
        collision_enabled: def.collision.unwrap_or(true),
        ..Surface::default()
    };
    for side in Side::ALL {
        model.sides_surfaces[side.index()][0] = bake_cube_side(side);
    }
    model.recompute_empty_sides_mask();
    model
}

fn bake_fluid_block(def: &BlockDef, fluid_index: u8, fluid: &BakedFluid) -> BakedModel {
    let mut model = BakedModel {
        surface_count: 1,
        side_pattern_indices: [SIDE_PATTERN_FULL; SIDE_COUNT],
        color: def_color(def),
        // Fluids sit in their own transparency layer by default so they stay
        // visible behind opaque cubes but cull between themselves.
        transparency_index: def.transparency_index.unwrap_or(1),
        culls_neighbors: def.culls_neighbors.unwrap_or(true),
        contributes_to_ao: def.contributes_to_ao.unwrap_or(false),
        empty: false,
        fluid_index,
        fluid_level: def.fluid_level.unwrap_or(fluid.max_level),
        ..BakedModel::default()
    };
    // Carries the material id; the mesher replaces the geometry procedurally.
    model.surfaces[0] = Surface {
        material_id: fluid.material_id,
        collision_enabled: false,
        ..Surface::default()
    };
    for side in Side::ALL {
        let src = &fluid.side_surfaces[side.index()];
        model.sides_surfaces[side.index()][0] = SideSurface {
            positions: src.positions.clone(),
            uvs: vec![Vec2::default(); src.positions.len()],
            indices: src.indices.clone(),
            tangents: src.tangents.clone(),
        };
    }
    model.recompute_empty_sides_mask();
    model
}

/// Bakes a declarative catalog into mesher-ready library data. Model id 0 is
/// always the empty air model; declared blocks get ids 1..=n in order.
pub fn bake_library(cfg: &LibraryConfig) -> Result<BakedLibrary, BakeError> {
    let material_ids: HashMap<&str, u32> = cfg
        .materials
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i as u32))
        .collect();
    let lookup_material = |block: &str, key: &str| -> Result<u32, BakeError> {
        material_ids
            .get(key)
            .copied()
            .ok_or_else(|| BakeError::UnknownMaterial {
                block: block.to_string(),
                key: key.to_string(),
            })
    };

    let mut fluids = Vec::with_capacity(cfg.fluids.len());
    let mut fluid_ids: HashMap<&str, u8> = HashMap::new();
    for def in &cfg.fluids {
        let material_id = lookup_material(&def.name, &def.material)?;
        fluid_ids.insert(def.name.as_str(), fluids.len() as u8);
        fluids.push(bake_fluid(def, material_id)?);
    }

    let mut models = Vec::with_capacity(cfg.blocks.len() + 1);
    models.push(BakedModel::default()); // AIR_ID
    for def in &cfg.blocks {
        let model = match &def.fluid {
            Some(fluid_key) => {
                let fluid_index = *fluid_ids.get(fluid_key.as_str()).ok_or_else(|| {
                    BakeError::UnknownFluid {
                        block: def.name.clone(),
                        key: fluid_key.clone(),
                    }
                })?;
                let fluid = &fluids[fluid_index as usize];
                if let Some(level) = def.fluid_level {
                    if level > fluid.max_level {
                        return Err(BakeError::BadFluidLevel {
                            block: def.name.clone(),
                            level,
                            max_level: fluid.max_level,
                        });
                    }
                }
                bake_fluid_block(def, fluid_index, fluid)
            }
            None => {
                let key = def
                    .material
                    .as_deref()
                    .ok_or_else(|| BakeError::MissingMaterial {
                        block: def.name.clone(),
                    })?;
                bake_cube_block(def, lookup_material(&def.name, key)?)
            }
        };
        models.push(model);
    }

    // Two baked patterns: empty and the full unit quad. Only a full pattern
    // covers anything.
    let side_pattern_count = 2;
    let mut side_pattern_culling = vec![false; (side_pattern_count * side_pattern_count) as usize];
    for a in [SIDE_PATTERN_EMPTY, SIDE_PATTERN_FULL] {
        side_pattern_culling[(a * side_pattern_count + SIDE_PATTERN_FULL) as usize] = true;
    }

    Ok(BakedLibrary {
        models,
        fluids,
        indexed_materials_count: cfg.materials.len() as u32,
        side_pattern_count,
        side_pattern_culling,
    })
}

/// Convenience wrapper: parse TOML, then bake.
pub fn bake_library_from_toml(toml_str: &str) -> Result<BakedLibrary, BakeError> {
    let cfg: LibraryConfig = toml::from_str(toml_str)?;
    bake_library(&cfg)
}
