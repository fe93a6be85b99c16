use karst_blocks::{BakedLibrary, Side, SideSurfaces, Surface, AIR_ID, SIDE_COUNT};
use karst_geom::Vec3;

use crate::arrays::{Arrays, CollisionSurface};
use crate::constants::PADDING;
use crate::emit::{append_collision, append_interior_surface, append_side_surface, FaceShading};
use crate::fluid::{generate_fluid_model, FluidScratch};
use crate::neighbors::NeighborLuts;
use crate::occlusion::bake_shaded_corners;

/// Decodes voxel ids out of the raw channel bytes. The channel is viewed at
/// its native bit depth without reinterpreting memory.
pub(crate) trait VoxelId: Copy {
    const BYTES: usize;
    fn read(channel: &[u8], index: usize) -> u32;
}

impl VoxelId for u8 {
    const BYTES: usize = 1;
    #[inline]
    fn read(channel: &[u8], index: usize) -> u32 {
        u32::from(channel[index])
    }
}

impl VoxelId for u16 {
    const BYTES: usize = 2;
    #[inline]
    fn read(channel: &[u8], index: usize) -> u32 {
        u32::from(u16::from_ne_bytes([
            channel[2 * index],
            channel[2 * index + 1],
        ]))
    }
}

/// Culled-face extraction over the inner region of a padded buffer.
///
/// Walks `[1, s-1)` on every axis so each voxel can look one neighbor away
/// without bounds checks, and dispatches per side to the visibility oracle,
/// the occlusion baker and the emitters. Emission order is a fixed function
/// of the inputs: z outer, x middle, y inner, sides in index order, surface
/// slots in order.
#[allow(clippy::too_many_arguments)]
pub(crate) fn generate_blocky_mesh<T: VoxelId>(
    arrays_per_material: &mut [Arrays],
    index_offsets: &mut [i32],
    mut collision_surface: Option<&mut CollisionSurface>,
    channel: &[u8],
    size: (usize, usize, usize),
    library: &BakedLibrary,
    bake_occlusion: bool,
    baked_occlusion_darkness: f32,
    fluid_scratch: &mut FluidScratch,
) {
    let (sx, sy, sz) = size;
    debug_assert!(sx >= 2 * PADDING && sy >= 2 * PADDING && sz >= 2 * PADDING);
    debug_assert_eq!(channel.len(), sx * sy * sz * T::BYTES);
    debug_assert_eq!(arrays_per_material.len(), index_offsets.len());

    let luts = NeighborLuts::new(sx, sy);
    let row_size = sy;
    let deck_size = sx * sy;

    for z in PADDING..sz - PADDING {
        for x in PADDING..sx - PADDING {
            for y in PADDING..sy - PADDING {
                let voxel_index = y + x * row_size + z * deck_size;
                let voxel_id = T::read(channel, voxel_index);

                if voxel_id == u32::from(AIR_ID) || !library.has_model(voxel_id) {
                    continue;
                }

                let voxel = &library.models[voxel_id as usize];

                let mut model_surface_count = voxel.surface_count;
                let mut model_surfaces: &[Surface] = &voxel.surfaces;
                let mut model_sides_surfaces: &[SideSurfaces; SIDE_COUNT] = &voxel.sides_surfaces;

                // Hybrid approach: cube sides are culled against neighbors,
                // while a model may also carry interior geometry that always
                // renders.

                if voxel.is_fluid() {
                    let (count, surfaces, sides) = generate_fluid_model::<T>(
                        voxel,
                        channel,
                        voxel_index,
                        1,
                        row_size as i32,
                        deck_size as i32,
                        library,
                        fluid_scratch,
                    );
                    model_surface_count = count;
                    model_surfaces = surfaces;
                    model_sides_surfaces = sides;
                }

                // Subtract the padding from emitted positions.
                let position = Vec3::new(
                    (x - PADDING) as f32,
                    (y - PADDING) as f32,
                    (z - PADDING) as f32,
                );

                for side in Side::ALL {
                    if voxel.empty_sides_mask & (1 << side.index()) != 0 {
                        continue;
                    }

                    // By default the whole side renders if it is visible.
                    let mut side_surfaces = &model_sides_surfaces[side.index()];

                    let neighbor_index =
                        (voxel_index as i64 + i64::from(luts.sides[side.index()])) as usize;
                    let neighbor_id = T::read(channel, neighbor_index);

                    // Ids beyond the library are treated like air.
                    if library.has_model(neighbor_id) {
                        let neighbor = &library.models[neighbor_id as usize];
                        if !library.visible_regardless_of_shape(voxel, neighbor) {
                            if !library.visible_according_to_shape(voxel, neighbor, side) {
                                // Completely occluded.
                                continue;
                            }

                            // Might be only partially visible.
                            if voxel.cutout_sides_enabled {
                                let neighbor_pattern =
                                    neighbor.side_pattern_indices[side.opposite().index()];
                                if let Some(cut) = voxel.cutout_side_surfaces[side.index()]
                                    .get(&neighbor_pattern)
                                {
                                    // Use the pre-cut side instead.
                                    side_surfaces = cut;
                                }
                            }
                        }
                    }

                    // The face is visible.

                    let shaded_corners = if bake_occlusion {
                        Some(bake_shaded_corners::<T>(
                            channel,
                            voxel_index,
                            side,
                            &luts,
                            library,
                        ))
                    } else {
                        None
                    };

                    for surface_index in 0..model_surface_count as usize {
                        let surface = &model_surfaces[surface_index];
                        assert!(
                            (surface.material_id as usize) < arrays_per_material.len(),
                            "baked material id {} outside the library's material count",
                            surface.material_id
                        );
                        let arrays = &mut arrays_per_material[surface.material_id as usize];
                        let index_offset = &mut index_offsets[surface.material_id as usize];
                        let side_surface = &side_surfaces[surface_index];

                        let shading = shaded_corners.as_ref().map(|shaded| FaceShading {
                            shaded_corners: shaded,
                            darkness: baked_occlusion_darkness,
                        });
                        append_side_surface(
                            arrays,
                            index_offset,
                            side_surface,
                            side,
                            position,
                            voxel.color,
                            shading.as_ref(),
                        );

                        if surface.collision_enabled {
                            if let Some(collision) = collision_surface.as_deref_mut() {
                                append_collision(
                                    collision,
                                    &side_surface.positions,
                                    &side_surface.indices,
                                    position,
                                );
                            }
                        }
                    }
                }

                // Interior geometry.
                for surface_index in 0..model_surface_count as usize {
                    let surface = &model_surfaces[surface_index];
                    if surface.positions.is_empty() {
                        continue;
                    }
                    assert!(
                        (surface.material_id as usize) < arrays_per_material.len(),
                        "baked material id {} outside the library's material count",
                        surface.material_id
                    );
                    let arrays = &mut arrays_per_material[surface.material_id as usize];
                    let index_offset = &mut index_offsets[surface.material_id as usize];

                    append_interior_surface(arrays, index_offset, surface, position, voxel.color);

                    if surface.collision_enabled {
                        if let Some(collision) = collision_surface.as_deref_mut() {
                            append_collision(
                                collision,
                                &surface.positions,
                                &surface.indices,
                                position,
                            );
                        }
                    }
                }
            }
        }
    }
}
