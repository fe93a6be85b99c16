use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::fluid::BakedFluid;
use crate::model::{BakedModel, Side};

/// Side pattern id for a side with no geometry.
pub const SIDE_PATTERN_EMPTY: u32 = 0;
/// Side pattern id for a full unit quad.
pub const SIDE_PATTERN_FULL: u32 = 1;

/// Read-only aggregate the mesher works from. Everything here is plain data
/// so it can be read from any number of meshing threads at once.
#[derive(Clone, Debug)]
pub struct BakedLibrary {
    pub models: Vec<BakedModel>,
    pub fluids: Vec<BakedFluid>,
    pub indexed_materials_count: u32,

    pub side_pattern_count: u32,
    /// Row-major `[pattern_a][pattern_b]`: true when pattern `b` fully covers
    /// pattern `a`, i.e. the face with pattern `a` is hidden.
    pub side_pattern_culling: Vec<bool>,
}

impl Default for BakedLibrary {
    fn default() -> Self {
        BakedLibrary {
            models: Vec::new(),
            fluids: Vec::new(),
            indexed_materials_count: 0,
            side_pattern_count: 0,
            side_pattern_culling: Vec::new(),
        }
    }
}

impl BakedLibrary {
    #[inline]
    pub fn has_model(&self, id: u32) -> bool {
        (id as usize) < self.models.len()
    }

    /// True when pattern `b` on the neighbor's opposing side fully covers
    /// pattern `a`.
    #[inline]
    pub fn is_side_culled(&self, pattern_a: u32, pattern_b: u32) -> bool {
        let n = self.side_pattern_count;
        if pattern_a >= n || pattern_b >= n {
            return false;
        }
        self.side_pattern_culling[(pattern_a * n + pattern_b) as usize]
    }

    /// Visibility that ignores geometry: the face of `voxel` against
    /// `neighbor` is kept when the neighbor is empty, more transparent, or
    /// opts out of culling its neighbors.
    #[inline]
    pub fn visible_regardless_of_shape(&self, voxel: &BakedModel, neighbor: &BakedModel) -> bool {
        neighbor.empty
            || neighbor.transparency_index > voxel.transparency_index
            || !neighbor.culls_neighbors
    }

    /// Shape-dependent visibility: the face survives unless the neighbor's
    /// opposing side pattern fully covers this side's pattern.
    #[inline]
    pub fn visible_according_to_shape(
        &self,
        voxel: &BakedModel,
        neighbor: &BakedModel,
        side: Side,
    ) -> bool {
        let pattern = voxel.side_pattern_indices[side.index()];
        let neighbor_pattern = neighbor.side_pattern_indices[side.opposite().index()];
        !self.is_side_culled(pattern, neighbor_pattern)
    }
}

/// Owner of the baked data. Meshing threads take the shared read for the
/// duration of one build; library editors take the exclusive write while
/// rebaking.
#[derive(Debug, Default)]
pub struct Library {
    baked: RwLock<BakedLibrary>,
}

impl Library {
    pub fn new(baked: BakedLibrary) -> Self {
        Library {
            baked: RwLock::new(baked),
        }
    }

    /// Shared read acquisition; held for a whole build.
    pub fn baked(&self) -> RwLockReadGuard<'_, BakedLibrary> {
        match self.baked.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Exclusive write acquisition for rebaking; excludes meshing for its
    /// duration.
    pub fn baked_mut(&self) -> RwLockWriteGuard<'_, BakedLibrary> {
        match self.baked.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid() -> BakedModel {
        BakedModel {
            empty: false,
            culls_neighbors: true,
            side_pattern_indices: [SIDE_PATTERN_FULL; 6],
            ..BakedModel::default()
        }
    }

    fn two_pattern_library() -> BakedLibrary {
        BakedLibrary {
            side_pattern_count: 2,
            // b == FULL covers everything
            side_pattern_culling: vec![false, true, false, true],
            ..BakedLibrary::default()
        }
    }

    #[test]
    fn full_neighbors_cull_each_other() {
        let lib = two_pattern_library();
        let a = solid();
        let b = solid();
        assert!(!lib.visible_regardless_of_shape(&a, &b));
        assert!(!lib.visible_according_to_shape(&a, &b, Side::PosX));
    }

    #[test]
    fn empty_neighbor_keeps_the_face() {
        let lib = two_pattern_library();
        let a = solid();
        let air = BakedModel::default();
        assert!(lib.visible_regardless_of_shape(&a, &air));
    }

    #[test]
    fn more_transparent_neighbor_keeps_the_face() {
        let lib = two_pattern_library();
        let a = solid();
        let glassy = BakedModel {
            transparency_index: 1,
            ..solid()
        };
        assert!(lib.visible_regardless_of_shape(&a, &glassy));
        // but not the other way around
        assert!(!lib.visible_regardless_of_shape(&glassy, &a));
    }
}
