use karst_geom::Vec3;

use crate::model::SIDE_COUNT;

/// UV.x axis tags written into fluid vertices. Shaders decode these, so the
/// values are part of the ABI.
pub const UV_AXIS_X: f32 = 0.0;
pub const UV_AXIS_Y: f32 = 1.0;
pub const UV_AXIS_Z: f32 = 2.0;

/// Flow direction code written into fluid UV.y so shaders can animate flow.
/// Stable small integers: part of the ABI, do not renumber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlowState {
    Idle = 0,
    StraightPositiveX = 1,
    StraightPositiveZ = 2,
    StraightNegativeX = 3,
    StraightNegativeZ = 4,
    DiagonalPositiveXPositiveZ = 5,
    DiagonalPositiveXNegativeZ = 6,
    DiagonalNegativeXPositiveZ = 7,
    DiagonalNegativeXNegativeZ = 8,
}

impl FlowState {
    #[inline]
    pub fn uv_tag(self) -> f32 {
        self as i32 as f32
    }
}

/// One pre-baked fluid side: a unit quad whose two top vertices are the last
/// two positions, in clockwise order as seen looking at the top face. The
/// mesher relies on that ordering to raise top edges to the corner heights.
#[derive(Clone, Debug, Default)]
pub struct FluidSurface {
    pub positions: Vec<Vec3>,
    pub indices: Vec<i32>,
    pub tangents: Vec<f32>,
}

/// Mesher-ready fluid parameters shared by every model of the same fluid.
#[derive(Clone, Debug)]
pub struct BakedFluid {
    pub material_id: u32,
    /// At least 2; level 0 is the lowest surface, `max_level` a full voxel.
    pub max_level: u8,
    /// Fake the level of neighbors that can flow down to 0, producing steep
    /// slopes over ledges while max-level pools keep a flat surface.
    pub dip_when_flowing_down: bool,
    pub side_surfaces: [FluidSurface; SIDE_COUNT],
}

impl BakedFluid {
    /// Top-surface height of a level-0 fluid voxel.
    pub const BOTTOM_HEIGHT: f32 = 0.0;
    /// Top-surface height of a max-level fluid voxel. Covered voxels snap to
    /// 1.0 instead so they meet the fluid above them.
    pub const TOP_HEIGHT: f32 = 0.9;

    /// Linear interpolation from level to top-corner height.
    #[inline]
    pub fn level_to_height(&self, level: u8) -> f32 {
        let t = f32::from(level) / f32::from(self.max_level);
        Self::BOTTOM_HEIGHT + (Self::TOP_HEIGHT - Self::BOTTOM_HEIGHT) * t
    }
}
