use karst_blocks::{Side, SIDE_COUNT};

use crate::cube::{CORNER_COUNT, CORNER_SIDES, EDGE_COUNT, EDGE_SIDES};

/// Linear offsets to the 6 side, 12 edge, and 8 corner neighbors of a voxel
/// inside a padded buffer. Derived from the chunk dimensions at build start
/// so the same tables work for any padded size.
pub(crate) struct NeighborLuts {
    pub sides: [i32; SIDE_COUNT],
    pub edges: [i32; EDGE_COUNT],
    pub corners: [i32; CORNER_COUNT],
}

impl NeighborLuts {
    pub fn new(sx: usize, sy: usize) -> Self {
        let row_size = sy as i32; // +1 along x
        let deck_size = (sx * sy) as i32; // +1 along z

        let mut sides = [0i32; SIDE_COUNT];
        sides[Side::NegX.index()] = -row_size;
        sides[Side::PosX.index()] = row_size;
        sides[Side::NegY.index()] = -1;
        sides[Side::PosY.index()] = 1;
        sides[Side::NegZ.index()] = -deck_size;
        sides[Side::PosZ.index()] = deck_size;

        let mut edges = [0i32; EDGE_COUNT];
        for (edge, [a, b]) in EDGE_SIDES.iter().enumerate() {
            edges[edge] = sides[a.index()] + sides[b.index()];
        }

        let mut corners = [0i32; CORNER_COUNT];
        for (corner, [a, b, c]) in CORNER_SIDES.iter().enumerate() {
            corners[corner] = sides[a.index()] + sides[b.index()] + sides[c.index()];
        }

        NeighborLuts {
            sides,
            edges,
            corners,
        }
    }
}
