use karst_blocks::{BakedLibrary, Side, AIR_ID};
use karst_geom::Vec3;

use crate::arrays::Arrays;
use crate::constants::PADDING;
use crate::emit::append_side_surface;
use crate::mesh::VoxelId;

/// Maps face-local `(u, v, depth)` coordinates to world `(x, y, z)`,
/// consistent with the orientation of the pre-baked side surfaces.
fn side_to_block_coordinates(v: Vec3, side: Side) -> Vec3 {
    match side {
        Side::NegX | Side::PosX => Vec3::new(v.z, v.y, v.x),
        Side::NegY | Side::PosY => Vec3::new(v.y, v.z, v.x),
        Side::NegZ | Side::PosZ => v,
    }
}

/// Adds extra side geometry along one chunk face for every outer voxel
/// exposed to air, hiding cracks between meshes of different LOD.
///
/// This never looks at voxels of the finer LOD; the exposure test is the
/// cheap one (inward voxel non-air), so it can over-emit in rare
/// topologies but hides cracks most of the time. No occlusion shading.
#[allow(clippy::too_many_arguments)]
fn append_side_seams<T: VoxelId>(
    channel: &[u8],
    jump: (i32, i32, i32),
    plane: i32,
    size_u: usize,
    size_v: usize,
    side: Side,
    library: &BakedLibrary,
    arrays_per_material: &mut [Arrays],
) {
    let air = u32::from(AIR_ID);
    let pad = PADDING as i32;
    let plane_base = plane * jump.2;
    let side_sign = side.sign();

    // Outer voxels exist to occlude the inner region; they are never meshed
    // themselves, but here they tell us where the neighboring chunk has
    // matter that the coarser mesh must seal against.
    for u in pad..size_u as i32 - pad {
        for v in pad..size_v as i32 - pad {
            let buffer_index = (u * jump.0 + v * jump.1 + plane_base) as usize;
            let voxel_id = T::read(channel, buffer_index);

            if voxel_id == air {
                continue;
            }

            // Exposed to air somewhere in-plane?
            let n0 = T::read(channel, (buffer_index as i64 - i64::from(jump.0)) as usize);
            let n1 = T::read(channel, (buffer_index as i64 + i64::from(jump.0)) as usize);
            let n2 = T::read(channel, (buffer_index as i64 - i64::from(jump.1)) as usize);
            let n3 = T::read(channel, (buffer_index as i64 + i64::from(jump.1)) as usize);
            if n0 != air && n1 != air && n2 != air && n3 != air {
                continue;
            }

            // Does the outer voxel occlude an inner voxel?
            let inward_index =
                (buffer_index as i64 - i64::from(side_sign * jump.2)) as usize;
            let inward_id = T::read(channel, inward_index);
            if inward_id == air || !library.has_model(inward_id) {
                continue;
            }

            // It does: append the side of that inner voxel on the chunk face.
            let position = side_to_block_coordinates(
                Vec3::new(
                    (u - pad) as f32,
                    (v - pad) as f32,
                    (plane - (side_sign + 1)) as f32,
                ),
                side,
            );

            let inward = &library.models[inward_id as usize];
            let side_surfaces = &inward.sides_surfaces[side.index()];

            for surface_index in 0..inward.surface_count as usize {
                let surface = &inward.surfaces[surface_index];
                assert!(
                    (surface.material_id as usize) < arrays_per_material.len(),
                    "baked material id {} outside the library's material count",
                    surface.material_id
                );
                let arrays = &mut arrays_per_material[surface.material_id as usize];
                let side_surface = &side_surfaces[surface_index];

                let mut index_offset = arrays.positions.len() as i32;
                append_side_surface(
                    arrays,
                    &mut index_offset,
                    side_surface,
                    side,
                    position,
                    inward.color,
                    None,
                );
            }
        }
    }
}

/// Stitches all six chunk faces. Only called at non-zero LOD.
pub(crate) fn append_seams<T: VoxelId>(
    channel: &[u8],
    size: (usize, usize, usize),
    arrays_per_material: &mut [Arrays],
    library: &BakedLibrary,
) {
    let (sx, sy, sz) = size;
    let row = sy as i32;
    let deck = (sx * sy) as i32;

    let out = arrays_per_material;
    append_side_seams::<T>(channel, (row, 1, deck), 0, sx, sy, Side::NegZ, library, out);
    append_side_seams::<T>(
        channel,
        (row, 1, deck),
        (sz - 1) as i32,
        sx,
        sy,
        Side::PosZ,
        library,
        out,
    );
    append_side_seams::<T>(channel, (deck, 1, row), 0, sz, sy, Side::NegX, library, out);
    append_side_seams::<T>(
        channel,
        (deck, 1, row),
        (sx - 1) as i32,
        sz,
        sy,
        Side::PosX,
        library,
        out,
    );
    append_side_seams::<T>(channel, (deck, row, 1), 0, sz, sx, Side::NegY, library, out);
    append_side_seams::<T>(
        channel,
        (deck, row, 1),
        (sy - 1) as i32,
        sz,
        sx,
        Side::PosY,
        library,
        out,
    );
}
