use karst_blocks::{BakedLibrary, Side};
use karst_geom::{Color, Vec3};

use crate::cube::{CORNER_COUNT, CORNER_POSITIONS, EDGE_CORNERS, SIDE_CORNERS, SIDE_EDGES};
use crate::mesh::VoxelId;
use crate::neighbors::NeighborLuts;

/// Ids outside the library shade their neighbors like solids.
#[inline]
fn contributes_to_ao(library: &BakedLibrary, voxel_id: u32) -> bool {
    if library.has_model(voxel_id) {
        library.models[voxel_id as usize].contributes_to_ao
    } else {
        true
    }
}

/// Bakes the 0-3 shade of each cube corner for the face of the voxel at
/// `voxel_index` on `side`, from its 4 edge and 4 corner neighbors.
///
/// The edge pass must run before the corner pass: a corner already shaded by
/// both of its edges is fully dark (3) and its diagonal neighbor is not
/// consulted.
pub(crate) fn bake_shaded_corners<T: VoxelId>(
    channel: &[u8],
    voxel_index: usize,
    side: Side,
    luts: &NeighborLuts,
    library: &BakedLibrary,
) -> [u8; CORNER_COUNT] {
    let mut shaded = [0u8; CORNER_COUNT];

    for &edge in &SIDE_EDGES[side.index()] {
        let neighbor_index = (voxel_index as i64 + i64::from(luts.edges[edge])) as usize;
        if contributes_to_ao(library, T::read(channel, neighbor_index)) {
            shaded[EDGE_CORNERS[edge][0]] += 1;
            shaded[EDGE_CORNERS[edge][1]] += 1;
        }
    }

    for &corner in &SIDE_CORNERS[side.index()] {
        if shaded[corner] == 2 {
            shaded[corner] = 3;
        } else {
            let neighbor_index = (voxel_index as i64 + i64::from(luts.corners[corner])) as usize;
            if contributes_to_ao(library, T::read(channel, neighbor_index)) {
                shaded[corner] += 1;
            }
        }
    }

    shaded
}

/// Shades the modulate color for one vertex of a face: the strongest nearby
/// shaded corner wins, falling off with squared distance from the corner.
pub(crate) fn shade_vertex_color(
    modulate: Color,
    vertex_pos: Vec3,
    side: Side,
    shaded: &[u8; CORNER_COUNT],
    darkness: f32,
) -> Color {
    let mut shade = 0.0f32;
    for &corner in &SIDE_CORNERS[side.index()] {
        if shaded[corner] != 0 {
            let strength = darkness * f32::from(shaded[corner]);
            let falloff = (1.0 - CORNER_POSITIONS[corner].distance_squared(vertex_pos)).max(0.0);
            shade = shade.max(strength * falloff);
        }
    }
    modulate.shaded((1.0 - shade).clamp(0.0, 1.0))
}
