use karst_blocks::fluid::{UV_AXIS_X, UV_AXIS_Y, UV_AXIS_Z};
use karst_blocks::{
    BakedLibrary, BakedModel, FlowState, FluidSurface, Side, SideSurface, SideSurfaces, Surface,
    AIR_ID, SIDE_COUNT,
};
use karst_geom::{Vec2, Vec3};

use crate::mesh::VoxelId;

/// Per-thread scratch for procedural fluid geometry, reused for every fluid
/// voxel meshed on this thread.
#[derive(Default)]
pub(crate) struct FluidScratch {
    pub sides: [SideSurfaces; SIDE_COUNT],
    pub top: Surface,
}

/// Flow state by the 4-bit mask of which top corners sit at the minimum
/// level: `bit3 = c0, bit2 = c1, bit1 = c2, bit0 = c3`.
const FLOW_FROM_MIN_CORNERS: [FlowState; 16] = [
    // 0000: impossible, there is always at least one minimum
    FlowState::Idle,
    // 0001
    FlowState::DiagonalPositiveXPositiveZ,
    // 0010
    FlowState::DiagonalNegativeXPositiveZ,
    // 0011
    FlowState::StraightPositiveZ,
    // 0100
    FlowState::DiagonalNegativeXNegativeZ,
    // 0101: ambiguous
    FlowState::Idle,
    // 0110
    FlowState::StraightNegativeX,
    // 0111
    FlowState::DiagonalNegativeXPositiveZ,
    // 1000
    FlowState::DiagonalPositiveXNegativeZ,
    // 1001
    FlowState::StraightPositiveX,
    // 1010: ambiguous
    FlowState::Idle,
    // 1011
    FlowState::DiagonalPositiveXPositiveZ,
    // 1100
    FlowState::StraightNegativeZ,
    // 1101
    FlowState::DiagonalPositiveXNegativeZ,
    // 1110
    FlowState::DiagonalNegativeXNegativeZ,
    // 1111
    FlowState::Idle,
];

//    3-------2
//   /|      /|        z
//  / |     / |       /
// 0-------1     x---o
// |       |
// Corner k of the top quad adjoins the neighborhood cells listed in
// `corner_levels_from_fluid_levels`; cell layout is
//  8 7 6     z
//  5 4 3     |
//  2 1 0  x--o
fn corner_levels_from_fluid_levels(fluid_levels: &[u8; 9]) -> [u8; 4] {
    [
        fluid_levels[1]
            .max(fluid_levels[2])
            .max(fluid_levels[4])
            .max(fluid_levels[5]),
        fluid_levels[0]
            .max(fluid_levels[1])
            .max(fluid_levels[3])
            .max(fluid_levels[4]),
        fluid_levels[3]
            .max(fluid_levels[4])
            .max(fluid_levels[6])
            .max(fluid_levels[7]),
        fluid_levels[4]
            .max(fluid_levels[5])
            .max(fluid_levels[7])
            .max(fluid_levels[8]),
    ]
}

fn flow_state_from_corner_levels(corner_levels: [u8; 4]) -> FlowState {
    let min_level = corner_levels
        .iter()
        .copied()
        .min()
        .unwrap_or(0);
    let mask = (u8::from(corner_levels[0] == min_level) << 3)
        | (u8::from(corner_levels[1] == min_level) << 2)
        | (u8::from(corner_levels[2] == min_level) << 1)
        | u8::from(corner_levels[3] == min_level);
    FLOW_FROM_MIN_CORNERS[mask as usize]
}

// 3---2
// |   |   {0,1,2, 0,2,3} -> {0,1,3, 1,2,3}
// 0---1
// Moves the shared edge from the 0-2 diagonal to 1-3 so it stays aligned
// with a diagonal flow.
fn transpose_top_triangles(indices: &mut [i32]) {
    indices[2] = indices[5];
    indices[3] = indices[1];
}

fn copy_side(src: &FluidSurface, uv: Vec2, dst: &mut SideSurface) {
    dst.positions.clear();
    dst.positions.extend_from_slice(&src.positions);
    dst.uvs.clear();
    dst.uvs.resize(src.positions.len(), uv);
    dst.indices.clear();
    dst.indices.extend_from_slice(&src.indices);
    dst.tangents.clear();
    dst.tangents.extend_from_slice(&src.tangents);
}

fn copy_top(src: &FluidSurface, normal: Vec3, material_id: u32, dst: &mut Surface) {
    dst.positions.clear();
    dst.positions.extend_from_slice(&src.positions);
    dst.normals.clear();
    dst.normals.resize(src.positions.len(), normal);
    dst.uvs.clear();
    dst.indices.clear();
    dst.indices.extend_from_slice(&src.indices);
    dst.tangents.clear();
    dst.tangents.extend_from_slice(&src.tangents);
    dst.material_id = material_id;
    dst.collision_enabled = false;
}

/// Synthesizes the geometry for one fluid voxel, overriding the baked model's
/// surfaces for this voxel only. Returns the surface count, the interior
/// surfaces (the procedural top, or the model's empty surface when covered so
/// the material id still flows through), and the side surfaces.
///
/// UVs encode flow for the shader: UV.x is the axis tag of the side and UV.y
/// the flow state.
pub(crate) fn generate_fluid_model<'a, T: VoxelId>(
    voxel: &'a BakedModel,
    channel: &[u8],
    voxel_index: usize,
    y_jump: i32,
    x_jump: i32,
    z_jump: i32,
    library: &'a BakedLibrary,
    scratch: &'a mut FluidScratch,
) -> (u8, &'a [Surface], &'a [SideSurfaces; SIDE_COUNT]) {
    let top_voxel_id = T::read(channel, (voxel_index as i64 + i64::from(y_jump)) as usize);
    let fluid_top_covered = library.has_model(top_voxel_id)
        && library.models[top_voxel_id as usize].fluid_index == voxel.fluid_index;

    let fluid = &library.fluids[voxel.fluid_index as usize];

    // Fluids have only one material.
    const SURFACE_INDEX: usize = 0;

    // Lateral sides always advertise a straight +Z flow; the shader reads the
    // actual direction from the top surface.
    let lateral_uv = Vec2::new(UV_AXIS_X, FlowState::StraightPositiveZ.uv_tag());
    copy_side(
        &fluid.side_surfaces[Side::NegX.index()],
        lateral_uv,
        &mut scratch.sides[Side::NegX.index()][SURFACE_INDEX],
    );
    copy_side(
        &fluid.side_surfaces[Side::PosX.index()],
        lateral_uv,
        &mut scratch.sides[Side::PosX.index()][SURFACE_INDEX],
    );
    let lateral_uv_z = Vec2::new(UV_AXIS_Z, FlowState::StraightPositiveZ.uv_tag());
    copy_side(
        &fluid.side_surfaces[Side::NegZ.index()],
        lateral_uv_z,
        &mut scratch.sides[Side::NegZ.index()][SURFACE_INDEX],
    );
    copy_side(
        &fluid.side_surfaces[Side::PosZ.index()],
        lateral_uv_z,
        &mut scratch.sides[Side::PosZ.index()][SURFACE_INDEX],
    );

    // The bottom side is always idle.
    copy_side(
        &fluid.side_surfaces[Side::NegY.index()],
        Vec2::new(UV_AXIS_Y, FlowState::Idle.uv_tag()),
        &mut scratch.sides[Side::NegY.index()][SURFACE_INDEX],
    );

    // The top is never drawn as a side; when exposed it becomes the
    // procedural top surface below.
    scratch.sides[Side::PosY.index()][SURFACE_INDEX].clear();

    if fluid_top_covered {
        scratch.top.clear();
        // Expected to be empty, but still carries the material id downstream.
        return (1, &voxel.surfaces[..], &scratch.sides);
    }

    copy_top(
        &fluid.side_surfaces[Side::PosY.index()],
        Vec3::new(0.0, 1.0, 0.0),
        fluid.material_id,
        &mut scratch.top,
    );

    // Sample fluid levels over the horizontal 3x3 neighborhood.
    //  8 7 6     z
    //  5 4 3     |
    //  2 1 0  x--o
    let mut fluid_levels = [0u8; 9];
    let mut covered_neighbors: u32 = 0;
    let dip_when_flowing_down = fluid.dip_when_flowing_down;

    let mut i = 0usize;
    for dz in -1i32..=1 {
        for dx in -1i32..=1 {
            let nloc = (voxel_index as i64 + i64::from(dx * x_jump) + i64::from(dz * z_jump))
                as usize;
            let nid = T::read(channel, nloc);

            if library.has_model(nid) {
                let neighbor = &library.models[nid as usize];
                if neighbor.fluid_index == voxel.fluid_index {
                    fluid_levels[i] = neighbor.fluid_level;

                    // The current voxel is known not to be covered.
                    if i != 4 {
                        let anloc = (nloc as i64 + i64::from(y_jump)) as usize;
                        let anid = T::read(channel, anloc);
                        if anid != u32::from(AIR_ID) && library.has_model(anid) {
                            if library.models[anid as usize].fluid_index == voxel.fluid_index {
                                covered_neighbors |= 1 << i;
                            }
                        }
                    }

                    if dip_when_flowing_down
                        && neighbor.fluid_level != fluid.max_level
                        && covered_neighbors & (1 << i) == 0
                    {
                        // A fluid voxel above a space it can flow into fakes
                        // level 0 to create a steep slope. Max-level fluids
                        // sustain themselves so pool surfaces stay flat.
                        let bnloc = (nloc as i64 - i64::from(y_jump)) as usize;
                        let bnid = T::read(channel, bnloc);
                        if bnid == u32::from(AIR_ID) {
                            fluid_levels[i] = 0;
                        } else if library.has_model(bnid)
                            && library.models[bnid as usize].fluid_index == voxel.fluid_index
                        {
                            fluid_levels[i] = 0;
                        }
                    }
                }
            }

            i += 1;
        }
    }

    let corner_levels = corner_levels_from_fluid_levels(&fluid_levels);
    let flow_state = flow_state_from_corner_levels(corner_levels);

    let mut corner_heights = [0.0f32; 4];
    for (height, &level) in corner_heights.iter_mut().zip(&corner_levels) {
        *height = fluid.level_to_height(level);
    }

    // Corners that touch a covered neighbor sit at full height so the
    // surface meets the fluid above. Each corner checks the L-shaped cell
    // triple that shares it, diagonal included.
    if covered_neighbors & 0b000_001_011 != 0 {
        corner_heights[1] = 1.0;
    }
    if covered_neighbors & 0b000_100_110 != 0 {
        corner_heights[0] = 1.0;
    }
    if covered_neighbors & 0b011_001_000 != 0 {
        corner_heights[2] = 1.0;
    }
    if covered_neighbors & 0b110_100_000 != 0 {
        corner_heights[3] = 1.0;
    }

    scratch.top.uvs.clear();
    scratch
        .top
        .uvs
        .resize(4, Vec2::new(UV_AXIS_Y, flow_state.uv_tag()));

    // Lateral sides keep their top vertices in slots 2 and 3 (baked
    // invariant); raise them to the matching corner heights.
    {
        let side = &mut scratch.sides[Side::NegX.index()][SURFACE_INDEX];
        side.positions[2].y = corner_heights[2];
        side.positions[3].y = corner_heights[1];
    }
    {
        let side = &mut scratch.sides[Side::PosX.index()][SURFACE_INDEX];
        side.positions[2].y = corner_heights[0];
        side.positions[3].y = corner_heights[3];
    }
    {
        let side = &mut scratch.sides[Side::NegZ.index()][SURFACE_INDEX];
        side.positions[2].y = corner_heights[1];
        side.positions[3].y = corner_heights[0];
    }
    {
        let side = &mut scratch.sides[Side::PosZ.index()][SURFACE_INDEX];
        side.positions[2].y = corner_heights[3];
        side.positions[3].y = corner_heights[2];
    }

    // Top vertex k sits at corner k (counter-clockwise from (+x,-z)).
    for (k, height) in corner_heights.iter().enumerate() {
        scratch.top.positions[k].y = *height;
    }

    if matches!(
        flow_state,
        FlowState::DiagonalPositiveXPositiveZ | FlowState::DiagonalNegativeXNegativeZ
    ) {
        transpose_top_triangles(&mut scratch.top.indices);
    }

    (1, std::slice::from_ref(&scratch.top), &scratch.sides)
}
