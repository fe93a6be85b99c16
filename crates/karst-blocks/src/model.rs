use hashbrown::HashMap;

use karst_geom::{Color, Vec2, Vec3};

/// Convention to mean "nothing". Never assign a non-empty model at this index.
pub const AIR_ID: u16 = 0;
/// Marks a model that is not a fluid.
pub const NULL_FLUID_INDEX: u8 = 255;
/// A model can carry up to this many materials.
pub const MAX_SURFACES: usize = 2;
pub const SIDE_COUNT: usize = 6;

/// Axis-aligned cube side. Pairs of opposite sides are adjacent in the
/// ordering, so `opposite` is an index xor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    NegX = 0,
    PosX = 1,
    NegY = 2,
    PosY = 3,
    NegZ = 4,
    PosZ = 5,
}

impl Side {
    pub const ALL: [Side; SIDE_COUNT] = [
        Side::NegX,
        Side::PosX,
        Side::NegY,
        Side::PosY,
        Side::NegZ,
        Side::PosZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Side {
        Side::ALL[i % SIDE_COUNT]
    }

    #[inline]
    pub fn opposite(self) -> Side {
        Side::from_index(self.index() ^ 1)
    }

    /// -1 for the minus sides, +1 for the plus sides.
    #[inline]
    pub fn sign(self) -> i32 {
        if self.index() & 1 == 0 {
            -1
        } else {
            1
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Side::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Side::PosX => Vec3::new(1.0, 0.0, 0.0),
            Side::NegY => Vec3::new(0.0, -1.0, 0.0),
            Side::PosY => Vec3::new(0.0, 1.0, 0.0),
            Side::NegZ => Vec3::new(0.0, 0.0, -1.0),
            Side::PosZ => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Side-clipped geometry for one material slot of one cube side.
/// Normals are not stored; they are the same for the whole side.
#[derive(Clone, Debug, Default)]
pub struct SideSurface {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<i32>,
    /// Four floats per vertex (xyz + handedness); empty when not baked.
    pub tangents: Vec<f32>,
}

impl SideSurface {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
        self.tangents.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Interior geometry of a model for one material slot.
#[derive(Clone, Debug, Default)]
pub struct Surface {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<i32>,
    pub tangents: Vec<f32>,

    pub material_id: u32,
    pub collision_enabled: bool,
}

impl Surface {
    /// Clears geometry but keeps the material and collision settings.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
        self.tangents.clear();
    }
}

pub type SideSurfaces = [SideSurface; MAX_SURFACES];

/// Mesher-ready representation of one voxel id. Plain data: it is shared
/// read-only across meshing threads while editors rebake behind the library
/// lock.
#[derive(Clone, Debug)]
pub struct BakedModel {
    pub surfaces: [Surface; MAX_SURFACES],
    /// Side geometry, separated from the interior so it can be culled against
    /// neighbors per side.
    pub sides_surfaces: [SideSurfaces; SIDE_COUNT],
    pub surface_count: u8,
    /// Bit per side set when every slot of that side has no indices.
    pub empty_sides_mask: u8,

    /// Silhouette id per side, used for O(1) mutual-occlusion tests.
    pub side_pattern_indices: [u32; SIDE_COUNT],

    /// `[side] -> neighbor opposite-side pattern id -> pre-cut side variant`.
    /// Consulted only when a side passes the visibility test partially and
    /// `cutout_sides_enabled` is set; missing entries fall back to the full
    /// side surfaces.
    pub cutout_side_surfaces: [HashMap<u32, SideSurfaces>; SIDE_COUNT],
    pub cutout_sides_enabled: bool,

    /// Modulate applied to every emitted vertex color.
    pub color: Color,
    /// Equal indexes cull the shared face, a greater neighbor index keeps it.
    pub transparency_index: u8,
    pub culls_neighbors: bool,
    pub contributes_to_ao: bool,
    /// True iff the model emits no geometry at all.
    pub empty: bool,

    /// `NULL_FLUID_INDEX` or an index into the library's fluids.
    pub fluid_index: u8,
    pub fluid_level: u8,
}

impl Default for BakedModel {
    fn default() -> Self {
        BakedModel {
            surfaces: Default::default(),
            sides_surfaces: Default::default(),
            surface_count: 0,
            empty_sides_mask: 0b11_1111,
            side_pattern_indices: [0; SIDE_COUNT],
            cutout_side_surfaces: Default::default(),
            cutout_sides_enabled: false,
            color: Color::WHITE,
            transparency_index: 0,
            culls_neighbors: false,
            contributes_to_ao: false,
            empty: true,
            fluid_index: NULL_FLUID_INDEX,
            fluid_level: 0,
        }
    }
}

impl BakedModel {
    #[inline]
    pub fn is_fluid(&self) -> bool {
        self.fluid_index != NULL_FLUID_INDEX
    }

    /// Recomputes `empty_sides_mask` from the current side surfaces.
    pub fn recompute_empty_sides_mask(&mut self) {
        let mut mask = 0u8;
        for (i, side_surfaces) in self.sides_surfaces.iter().enumerate() {
            if side_surfaces.iter().all(|s| s.is_empty()) {
                mask |= 1 << i;
            }
        }
        self.empty_sides_mask = mask;
    }
}
