use karst_blocks::{Side, SideSurface, Surface};
use karst_geom::{Color, Vec3};

use crate::arrays::{Arrays, CollisionSurface};
use crate::cube::CORNER_COUNT;
use crate::occlusion::shade_vertex_color;

/// Occlusion shading context for one face: the baked corner shades and the
/// effective darkness.
pub(crate) struct FaceShading<'a> {
    pub shaded_corners: &'a [u8; CORNER_COUNT],
    pub darkness: f32,
}

/// Appends one side surface to a material's arrays: positions offset by the
/// voxel position, a constant side normal, verbatim uvs/tangents, shaded or
/// plain modulate colors, and indices rebased by the material's running
/// vertex count.
pub(crate) fn append_side_surface(
    arrays: &mut Arrays,
    index_offset: &mut i32,
    side_surface: &SideSurface,
    side: Side,
    position: Vec3,
    modulate: Color,
    shading: Option<&FaceShading<'_>>,
) {
    let vertex_count = side_surface.positions.len();

    for p in &side_surface.positions {
        arrays.positions.push(*p + position);
    }
    arrays.uvs.extend_from_slice(&side_surface.uvs);
    if !side_surface.tangents.is_empty() {
        arrays.tangents.extend_from_slice(&side_surface.tangents);
    }

    let normal = side.normal();
    for _ in 0..vertex_count {
        arrays.normals.push(normal);
    }

    match shading {
        Some(shading) => {
            // Shade from the vertex position in model space, before the voxel
            // offset; the corner reference positions live in the unit cube.
            for p in &side_surface.positions {
                arrays.colors.push(shade_vertex_color(
                    modulate,
                    *p,
                    side,
                    shading.shaded_corners,
                    shading.darkness,
                ));
            }
        }
        None => {
            for _ in 0..vertex_count {
                arrays.colors.push(modulate);
            }
        }
    }

    for &i in &side_surface.indices {
        arrays.indices.push(*index_offset + i);
    }
    *index_offset += vertex_count as i32;
}

/// Appends a model's interior surface. No occlusion shading is applied to
/// interior geometry.
pub(crate) fn append_interior_surface(
    arrays: &mut Arrays,
    index_offset: &mut i32,
    surface: &Surface,
    position: Vec3,
    modulate: Color,
) {
    let vertex_count = surface.positions.len();

    for p in &surface.positions {
        arrays.positions.push(*p + position);
    }
    arrays.normals.extend_from_slice(&surface.normals);
    arrays.uvs.extend_from_slice(&surface.uvs);
    if !surface.tangents.is_empty() {
        arrays.tangents.extend_from_slice(&surface.tangents);
    }
    for _ in 0..vertex_count {
        arrays.colors.push(modulate);
    }

    for &i in &surface.indices {
        arrays.indices.push(*index_offset + i);
    }
    *index_offset += vertex_count as i32;
}

/// Replicates positions and rebased indices into the collision mesh. The
/// collision surface carries no normals, uvs, colors or tangents.
pub(crate) fn append_collision(
    collision: &mut CollisionSurface,
    positions: &[Vec3],
    indices: &[i32],
    position: Vec3,
) {
    let base = collision.positions.len() as i32;
    for p in positions {
        collision.positions.push(*p + position);
    }
    for &i in indices {
        collision.indices.push(base + i);
    }
}
