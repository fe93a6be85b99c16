//! Fixed cube incidence tables: which edges and corners attach to each side.
//!
//! Corners are numbered by axis bits (`x = bit 0`, `y = bit 1`, `z = bit 2`),
//! edges by the axis they run along (0-3 along X, 4-7 along Y, 8-11 along Z).
//! The occlusion pass and the neighbor LUTs both index through these tables,
//! so the numbering must stay stable across the whole crate.

use karst_blocks::{Side, SIDE_COUNT};
use karst_geom::Vec3;

pub(crate) const EDGE_COUNT: usize = 12;
pub(crate) const CORNER_COUNT: usize = 8;

/// The two sides an edge belongs to; the edge's neighbor offset is the sum of
/// the two side offsets.
pub(crate) const EDGE_SIDES: [[Side; 2]; EDGE_COUNT] = [
    [Side::NegY, Side::NegZ],
    [Side::PosY, Side::NegZ],
    [Side::NegY, Side::PosZ],
    [Side::PosY, Side::PosZ],
    [Side::NegX, Side::NegZ],
    [Side::PosX, Side::NegZ],
    [Side::NegX, Side::PosZ],
    [Side::PosX, Side::PosZ],
    [Side::NegX, Side::NegY],
    [Side::PosX, Side::NegY],
    [Side::NegX, Side::PosY],
    [Side::PosX, Side::PosY],
];

/// The three sides meeting at a corner; the corner's neighbor offset is the
/// sum of the three side offsets.
pub(crate) const CORNER_SIDES: [[Side; 3]; CORNER_COUNT] = [
    [Side::NegX, Side::NegY, Side::NegZ],
    [Side::PosX, Side::NegY, Side::NegZ],
    [Side::NegX, Side::PosY, Side::NegZ],
    [Side::PosX, Side::PosY, Side::NegZ],
    [Side::NegX, Side::NegY, Side::PosZ],
    [Side::PosX, Side::NegY, Side::PosZ],
    [Side::NegX, Side::PosY, Side::PosZ],
    [Side::PosX, Side::PosY, Side::PosZ],
];

/// The four edges attached to each side.
pub(crate) const SIDE_EDGES: [[usize; 4]; SIDE_COUNT] = [
    [4, 6, 8, 10],
    [5, 7, 9, 11],
    [0, 2, 8, 9],
    [1, 3, 10, 11],
    [0, 1, 4, 5],
    [2, 3, 6, 7],
];

/// The four cube corners on each side.
pub(crate) const SIDE_CORNERS: [[usize; 4]; SIDE_COUNT] = [
    [0, 2, 4, 6],
    [1, 3, 5, 7],
    [0, 1, 4, 5],
    [2, 3, 6, 7],
    [0, 1, 2, 3],
    [4, 5, 6, 7],
];

/// The two corners an edge connects.
pub(crate) const EDGE_CORNERS: [[usize; 2]; EDGE_COUNT] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Corner positions in the voxel-local unit cube; the occlusion pass shades
/// vertices by squared distance to these.
pub(crate) const CORNER_POSITIONS: [Vec3; CORNER_COUNT] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];
